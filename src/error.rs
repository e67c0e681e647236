use std::sync::Arc;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::services::CatalogError;

/// Errors surfaced by the matching service
#[derive(Debug, Clone, Error)]
pub enum SchemeError {
    /// Malformed or missing request data
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The scheme catalog could not be read or parsed
    #[error("Catalog unavailable: {0}")]
    Data(#[from] Arc<CatalogError>),
}

impl From<CatalogError> for SchemeError {
    fn from(value: CatalogError) -> Self {
        SchemeError::Data(Arc::new(value))
    }
}

impl From<validator::ValidationErrors> for SchemeError {
    fn from(value: validator::ValidationErrors) -> Self {
        SchemeError::Input(value.to_string())
    }
}

impl SchemeError {
    fn error_label(&self) -> &'static str {
        match self {
            SchemeError::Input(_) => "invalid_input",
            SchemeError::NotFound(_) => "not_found",
            SchemeError::Data(_) => "catalog_unavailable",
        }
    }
}

impl ResponseError for SchemeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SchemeError::Input(_) => StatusCode::BAD_REQUEST,
            SchemeError::NotFound(_) => StatusCode::NOT_FOUND,
            SchemeError::Data(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let SchemeError::Data(e) = self {
            tracing::error!("Catalog error: {}", e);
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.error_label().to_string(),
            message: self.to_string(),
            status_code: self.status_code().as_u16(),
        })
    }
}
