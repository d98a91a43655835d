use thiserror::Error;

use crate::domain::product::ProductId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("sku `{sku}` is already present in the catalog")]
    DuplicateSku { sku: String },
    #[error("product {id} was not found")]
    NotFound { id: String },
    #[error("invalid product payload: {0}")]
    Validation(String),
    #[error("catalog internal failure: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn not_found(id: ProductId) -> Self {
        Self::NotFound { id: id.to_string() }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("conflict: {message}")]
    Conflict { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("unprocessable: {message}")]
    Unprocessable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    /// Text that is safe to return to a caller. Internal details stay in the
    /// `message` field for logging only.
    pub fn user_message(&self) -> String {
        match self {
            Self::Conflict { .. } => "SKU already present!".to_owned(),
            Self::NotFound { message, .. } | Self::Unprocessable { message, .. } => {
                message.clone()
            }
            Self::Internal { .. } => "Internal Server Error".to_owned(),
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::Conflict { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::Unprocessable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl CatalogError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::Conflict { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::Unprocessable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<CatalogError> for InterfaceError {
    fn from(value: CatalogError) -> Self {
        let correlation_id = "unassigned".to_owned();
        match value {
            CatalogError::DuplicateSku { sku } => {
                Self::Conflict { message: format!("sku `{sku}` already present"), correlation_id }
            }
            CatalogError::NotFound { id } => {
                Self::NotFound { message: format!("Product ID {id} not found!"), correlation_id }
            }
            CatalogError::Validation(message) => Self::Unprocessable { message, correlation_id },
            CatalogError::Internal(message) => Self::Internal { message, correlation_id },
        }
    }
}
