use std::time::Instant;

use anyhow::{bail, ensure, Context};
use serde::Serialize;
use stockroom_core::config::{AppConfig, LoadOptions};
use stockroom_core::{CatalogError, CatalogStore, InMemoryCatalog, ProductDetails, ProductPatch};

use crate::commands::{escape_json, CommandResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SmokeStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: SmokeStatus,
    elapsed_ms: u64,
    message: String,
}

#[derive(Debug, Serialize)]
struct SmokeReport {
    command: &'static str,
    status: SmokeStatus,
    summary: String,
    total_elapsed_ms: u64,
    checks: Vec<SmokeCheck>,
}

pub fn run() -> CommandResult {
    let started = Instant::now();
    let mut checks = Vec::new();

    match timed_check(|| AppConfig::load(LoadOptions::default())) {
        Ok((elapsed_ms, _config)) => checks.push(SmokeCheck {
            name: "config_validation",
            status: SmokeStatus::Pass,
            elapsed_ms,
            message: "configuration loaded and validated".to_string(),
        }),
        Err((elapsed_ms, error)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Fail,
                elapsed_ms,
                message: error.to_string(),
            });
            checks.push(skipped("catalog_lifecycle"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            checks.push(SmokeCheck {
                name: "catalog_lifecycle",
                status: SmokeStatus::Fail,
                elapsed_ms: 0,
                message: format!("failed to initialize async runtime: {error}"),
            });
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let catalog_started = Instant::now();
    let catalog = InMemoryCatalog::new();
    let outcome = runtime.block_on(exercise_catalog(&catalog));
    let elapsed_ms = catalog_started.elapsed().as_millis() as u64;
    checks.push(match outcome {
        Ok(steps) => SmokeCheck {
            name: "catalog_lifecycle",
            status: SmokeStatus::Pass,
            elapsed_ms,
            message: format!("{steps} catalog steps behaved as expected"),
        },
        Err(error) => SmokeCheck {
            name: "catalog_lifecycle",
            status: SmokeStatus::Fail,
            elapsed_ms,
            message: format!("{error:#}"),
        },
    });

    finalize_report(checks, started.elapsed().as_millis() as u64)
}

/// Create, list, reject a duplicate, update, delete. Returns the number of
/// steps that ran.
async fn exercise_catalog(catalog: &dyn CatalogStore) -> anyhow::Result<usize> {
    let details = ProductDetails {
        name: "Aspirin".to_string(),
        price: 5.0,
        stock: 100,
        sku: "ASP-1".to_string(),
    };

    let created = catalog.create(details.clone()).await.context("create product")?;
    ensure!(created.id.0 == 0, "first product id should be 0, got {}", created.id);

    let listed = catalog.list().await;
    ensure!(listed.len() == 1, "expected one listed product, got {}", listed.len());

    match catalog.create(details).await {
        Err(CatalogError::DuplicateSku { .. }) => {}
        Ok(product) => bail!("duplicate sku was accepted as product {}", product.id),
        Err(other) => bail!("duplicate sku failed with unexpected error: {other}"),
    }
    ensure!(catalog.count().await == 1, "rejected create must not change catalog size");

    let updated = catalog
        .update(created.id, ProductPatch { price: Some(6.0), ..ProductPatch::default() })
        .await
        .context("update product price")?;
    ensure!(updated.sku == created.sku && updated.stock == created.stock, "update lost fields");

    catalog.delete(created.id).await.context("delete product")?;
    ensure!(catalog.list().await.is_empty(), "catalog should be empty after delete");

    Ok(6)
}

fn timed_check<T, E>(check: impl FnOnce() -> Result<T, E>) -> Result<(u64, T), (u64, E)> {
    let started = Instant::now();
    match check() {
        Ok(value) => Ok((started.elapsed().as_millis() as u64, value)),
        Err(error) => Err((started.elapsed().as_millis() as u64, error)),
    }
}

fn skipped(name: &'static str) -> SmokeCheck {
    SmokeCheck {
        name,
        status: SmokeStatus::Skipped,
        elapsed_ms: 0,
        message: "skipped due previous failure".to_string(),
    }
}

fn finalize_report(checks: Vec<SmokeCheck>, total_elapsed_ms: u64) -> CommandResult {
    let passed = checks.iter().filter(|check| check.status == SmokeStatus::Pass).count();
    let total = checks.len();
    let failed = checks.iter().any(|check| check.status == SmokeStatus::Fail);

    let report = SmokeReport {
        command: "smoke",
        status: if failed { SmokeStatus::Fail } else { SmokeStatus::Pass },
        summary: format!("smoke: {passed}/{total} checks passed in {total_elapsed_ms}ms"),
        total_elapsed_ms,
        checks,
    };

    let human = report.summary.clone();
    let machine = serde_json::to_string(&report).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"smoke\",\"status\":\"fail\",\"summary\":\"serialization failed\",\"error\":\"{}\"}}",
            escape_json(&error.to_string())
        )
    });

    CommandResult { exit_code: if failed { 6 } else { 0 }, output: format!("{human}\n{machine}") }
}
