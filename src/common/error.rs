// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::SaleStatus;

/// Crate-wide error type. Every mutating operation either fully applies its
/// effect or returns one of these with none of the effect applied.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(#[from] validator::ValidationErrors),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// A mutation was attempted against a sale already in a terminal state.
    #[error("sale already ended with status {0}")]
    SaleClosed(SaleStatus),

    /// Requested quantity exceeds what the branch has on hand. Recoverable
    /// by the operator (reduce the quantity and retry).
    #[error("not enough stock of product {product_id}: requested {requested}")]
    InsufficientStock { product_id: Uuid, requested: i32 },

    /// A tarif row carries a type the commission engine does not recognize.
    /// Configuration error: fail loudly instead of defaulting.
    #[error("unknown tarif type {0:?}")]
    InvalidTarif(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            // Return every field-level validation detail, not just the first.
            AppError::Validation(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "one or more fields are invalid",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),

            // Callers must be able to tell "sale is finished" (410) apart
            // from "stock ran out" (409) and from hard failures (500).
            AppError::SaleClosed(_) => (StatusCode::GONE, self.to_string()),
            AppError::InsufficientStock { .. } => (StatusCode::CONFLICT, self.to_string()),

            AppError::InvalidTarif(_) => {
                tracing::error!("commission misconfiguration: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "commission configuration error".to_string(),
                )
            }

            e => {
                tracing::error!("internal server error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
