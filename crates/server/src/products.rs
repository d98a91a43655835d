//! Product catalog routes.
//!
//! - `POST   /products/`: create a product from `ProductDetails`
//! - `GET    /products/`: list every product in insertion order
//! - `GET    /products/{id}`: fetch one product
//! - `PUT    /products/{id}`: merge a `ProductPatch` into a product
//! - `DELETE /products/{id}`: remove a product
//!
//! The collection routes also answer without the trailing slash.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{StatusCode, Uri},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stockroom_core::{
    CatalogError, CatalogStore, InterfaceError, Product, ProductDetails, ProductId, ProductPatch,
};
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct CatalogState {
    catalog: Arc<dyn CatalogStore>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub detail: String,
}

type ApiError = (StatusCode, Json<Detail>);

pub fn router(catalog: Arc<dyn CatalogStore>) -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/", get(list_products).post(create_product))
        .route("/products/{id}", get(get_product).put(update_product).delete(delete_product))
        .with_state(CatalogState { catalog })
}

async fn create_product(
    State(state): State<CatalogState>,
    payload: Result<Json<ProductDetails>, JsonRejection>,
) -> Result<(StatusCode, Json<Detail>), ApiError> {
    let correlation_id = correlation_id();
    let Json(details) = payload.map_err(|rejection| bad_body(rejection, &correlation_id))?;

    let product =
        state.catalog.create(details).await.map_err(|error| api_error(error, &correlation_id))?;

    info!(
        event_name = "http.products.created",
        correlation_id = %correlation_id,
        product_id = %product.id,
        sku = %product.sku,
        "product created"
    );
    Ok((StatusCode::CREATED, detail("Data Inserted Successfully!")))
}

async fn list_products(State(state): State<CatalogState>) -> Json<Vec<Product>> {
    Json(state.catalog.list().await)
}

async fn get_product(
    path: Result<Path<String>, PathRejection>,
    uri: Uri,
    State(state): State<CatalogState>,
) -> Result<Json<Product>, ApiError> {
    let correlation_id = correlation_id();
    let id = parse_id(path, &uri, &correlation_id)?;

    state.catalog.get(id).await.map(Json).map_err(|error| api_error(error, &correlation_id))
}

async fn update_product(
    path: Result<Path<String>, PathRejection>,
    uri: Uri,
    State(state): State<CatalogState>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<Detail>, ApiError> {
    let correlation_id = correlation_id();
    let id = parse_id(path, &uri, &correlation_id)?;
    let Json(patch) = payload.map_err(|rejection| bad_body(rejection, &correlation_id))?;

    state.catalog.update(id, patch).await.map_err(|error| api_error(error, &correlation_id))?;

    info!(
        event_name = "http.products.updated",
        correlation_id = %correlation_id,
        product_id = %id,
        "product updated"
    );
    Ok(detail(format!("Product ID {id} Updated!")))
}

async fn delete_product(
    path: Result<Path<String>, PathRejection>,
    uri: Uri,
    State(state): State<CatalogState>,
) -> Result<(StatusCode, Json<Detail>), ApiError> {
    let correlation_id = correlation_id();
    let id = parse_id(path, &uri, &correlation_id)?;

    state.catalog.delete(id).await.map_err(|error| api_error(error, &correlation_id))?;

    info!(
        event_name = "http.products.deleted",
        correlation_id = %correlation_id,
        product_id = %id,
        "product deleted"
    );
    Ok((StatusCode::ACCEPTED, detail("Delete Operation Successfull!")))
}

/// Anything that is not a valid product id cannot name a stored product, so
/// it is reported the same way as an unknown id. Segments that do not decode
/// to UTF-8 are echoed back still percent-encoded.
fn parse_id(
    path: Result<Path<String>, PathRejection>,
    uri: &Uri,
    correlation_id: &str,
) -> Result<ProductId, ApiError> {
    let raw_id = match path {
        Ok(Path(raw_id)) => raw_id,
        Err(_) => uri.path().rsplit('/').next().unwrap_or_default().to_string(),
    };

    match raw_id.parse::<ProductId>() {
        Ok(id) => Ok(id),
        Err(_) => Err(api_error(CatalogError::NotFound { id: raw_id }, correlation_id)),
    }
}

fn api_error(error: CatalogError, correlation_id: &str) -> ApiError {
    let interface = error.into_interface(correlation_id);
    let status = match &interface {
        InterfaceError::Conflict { .. } => StatusCode::CONFLICT,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if let InterfaceError::Internal { message, .. } = &interface {
        error!(
            event_name = "http.products.internal_error",
            correlation_id = %correlation_id,
            error = %message,
            "catalog operation failed unexpectedly"
        );
    } else {
        warn!(
            event_name = "http.products.rejected",
            correlation_id = %correlation_id,
            status = status.as_u16(),
            reason = %interface,
            "catalog request rejected"
        );
    }

    (status, detail(interface.user_message()))
}

fn bad_body(rejection: JsonRejection, correlation_id: &str) -> ApiError {
    api_error(CatalogError::Validation(rejection.body_text()), correlation_id)
}

fn detail(message: impl Into<String>) -> Json<Detail> {
    Json(Detail { detail: message.into() })
}

fn correlation_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use stockroom_core::{CatalogStore, IdSequence, InMemoryCatalog};
    use tower::ServiceExt;

    use super::router;

    fn app() -> Router {
        router(Arc::new(InMemoryCatalog::new()))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request should build"),
            None => builder.body(Body::empty()).expect("request should build"),
        };

        let response = app.clone().oneshot(request).await.expect("router should respond");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body should read");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be json")
        };
        (status, value)
    }

    fn aspirin() -> Value {
        json!({"name": "Aspirin", "price": 5.0, "stock": 100, "sku": "ASP-1"})
    }

    fn stored_aspirin() -> Value {
        json!({"id": 0, "name": "Aspirin", "price": 5.0, "stock": 100, "sku": "ASP-1"})
    }

    #[tokio::test]
    async fn aspirin_scenario_over_http() {
        let app = app();

        let (status, body) = send(&app, Method::POST, "/products/", Some(aspirin())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"detail": "Data Inserted Successfully!"}));

        let (status, body) = send(&app, Method::GET, "/products/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([stored_aspirin()]));

        let (status, body) = send(&app, Method::POST, "/products/", Some(aspirin())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({"detail": "SKU already present!"}));

        let (_, body) = send(&app, Method::GET, "/products/", None).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));

        let (status, body) = send(&app, Method::DELETE, "/products/0", None).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body, json!({"detail": "Delete Operation Successfull!"}));

        let (_, body) = send(&app, Method::GET, "/products/", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn collection_route_works_without_trailing_slash() {
        let app = app();

        let (status, _) = send(&app, Method::POST, "/products", Some(aspirin())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, Method::GET, "/products", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["sku"], "ASP-1");
    }

    #[tokio::test]
    async fn get_returns_created_record() {
        let app = app();
        send(&app, Method::POST, "/products/", Some(aspirin())).await;

        let (status, body) = send(&app, Method::GET, "/products/0", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, stored_aspirin());
    }

    #[tokio::test]
    async fn unknown_negative_and_garbage_ids_are_not_found() {
        let app = app();
        send(&app, Method::POST, "/products/", Some(aspirin())).await;

        let cases = [
            ("1", "1"),
            ("-1", "-1"),
            ("abc", "abc"),
            ("18446744073709551616", "18446744073709551616"),
            ("%200", " 0"),
            ("%FF", "%FF"),
        ];
        for (segment, shown) in cases {
            let uri = format!("/products/{segment}");
            let expected = json!({"detail": format!("Product ID {shown} not found!")});

            let (status, body) = send(&app, Method::GET, &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "GET {uri}");
            assert_eq!(body, expected);

            let (status, body) =
                send(&app, Method::PUT, &uri, Some(json!({"price": 2.0}))).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "PUT {uri}");
            assert_eq!(body, expected);

            let (status, body) = send(&app, Method::DELETE, &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "DELETE {uri}");
            assert_eq!(body, expected);
        }

        let (_, body) = send(&app, Method::GET, "/products/", None).await;
        assert_eq!(body, json!([stored_aspirin()]));
    }

    #[tokio::test]
    async fn partial_update_merges_and_acknowledges_requested_id() {
        let app = app();
        send(&app, Method::POST, "/products/", Some(aspirin())).await;
        send(
            &app,
            Method::POST,
            "/products/",
            Some(json!({"name": "Ibuprofen", "price": 3.0, "stock": 20, "sku": "IBU-1"})),
        )
        .await;

        let (status, body) =
            send(&app, Method::PUT, "/products/1", Some(json!({"price": 4.5}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"detail": "Product ID 1 Updated!"}));

        let (_, body) = send(&app, Method::GET, "/products/", None).await;
        assert_eq!(
            body,
            json!([
                {"id": 0, "name": "Aspirin", "price": 5.0, "stock": 100, "sku": "ASP-1"},
                {"id": 1, "name": "Ibuprofen", "price": 4.5, "stock": 20, "sku": "IBU-1"}
            ])
        );
    }

    #[tokio::test]
    async fn update_to_taken_sku_conflicts() {
        let app = app();
        send(&app, Method::POST, "/products/", Some(aspirin())).await;
        send(
            &app,
            Method::POST,
            "/products/",
            Some(json!({"name": "Ibuprofen", "price": 3.0, "stock": 20, "sku": "IBU-1"})),
        )
        .await;

        let (status, _) =
            send(&app, Method::PUT, "/products/1", Some(json!({"sku": "ASP-1"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_payloads_are_unprocessable() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/products/",
            Some(json!({"name": "Aspirin", "price": 0.0, "stock": 1, "sku": "ASP-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({"detail": "price must be greater than 0"}));

        let (status, body) =
            send(&app, Method::POST, "/products/", Some(json!({"name": "Aspirin"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());

        let (_, body) = send(&app, Method::GET, "/products/", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn invalid_update_is_unprocessable_and_leaves_record_unchanged() {
        let app = app();
        send(&app, Method::POST, "/products/", Some(aspirin())).await;

        let (status, body) =
            send(&app, Method::PUT, "/products/0", Some(json!({"price": 0}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({"detail": "price must be greater than 0"}));

        let (status, body) =
            send(&app, Method::PUT, "/products/0", Some(json!({"name": "  "}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({"detail": "name must not be empty"}));

        let (status, body) = send(&app, Method::GET, "/products/0", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, stored_aspirin());
    }

    #[tokio::test]
    async fn exhausted_id_sequence_is_reported_as_internal_error() {
        let catalog: Arc<dyn CatalogStore> =
            Arc::new(InMemoryCatalog::with_id_sequence(IdSequence::starting_at(u64::MAX)));
        let app = router(catalog);

        let (status, body) = send(&app, Method::POST, "/products/", Some(aspirin())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"detail": "Internal Server Error"}));
    }
}
