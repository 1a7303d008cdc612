//! API Error Types

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use inference_engine::InferenceError;
use serde::Serialize;
use tax_engine::TaxError;
use thiserror::Error;
use tracing::warn;

/// Errors returned by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Tax(#[from] TaxError),
    #[error("Invalid request body: {}", .0.body_text())]
    Body(#[from] JsonRejection),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Unknown log level '{0}'")]
    InvalidLogLevel(String),
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    /// HTTP status and machine-readable kind
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Inference(e) => match e {
                InferenceError::Validation(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
                InferenceError::CategoryMismatch { .. } => {
                    (StatusCode::BAD_REQUEST, "category_mismatch")
                }
                InferenceError::Encoding(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "encoding_mismatch")
                }
                InferenceError::CategoryUnavailable { .. } => {
                    (StatusCode::SERVICE_UNAVAILABLE, "category_unavailable")
                }
                InferenceError::Dataset(_)
                | InferenceError::Schema(_)
                | InferenceError::Training(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "model_error")
                }
            },
            ApiError::Tax(TaxError::UndefinedRule { .. }) => {
                (StatusCode::BAD_REQUEST, "undefined_tax_rule")
            }
            ApiError::Tax(TaxError::Validation(_)) => (StatusCode::BAD_REQUEST, "invalid_input"),
            ApiError::Body(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, kind) = self.classify();
        if status.is_server_error() {
            warn!("Request failed: {}", self);
        }
        let body = ErrorBody {
            error: kind,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
