//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`, and every error body is JSON with an `error` field.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::ValidationError;
use crate::services::{CheckoutError, JournalError, ReportError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Checkout was rejected or could not complete.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Report could not be built.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Sales journal read failed.
    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),

    /// Request body failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::InvalidReference(_) => StatusCode::BAD_REQUEST,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Checkout(err) => match err {
                CheckoutError::InvalidCart(_) | CheckoutError::AmountTooLarge => {
                    StatusCode::BAD_REQUEST
                }
                CheckoutError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                CheckoutError::InsufficientStock { .. } => StatusCode::CONFLICT,
                CheckoutError::Unavailable(_) | CheckoutError::PersistenceFailure(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
            },
            Self::Report(err) => match err {
                ReportError::InvalidRange(_) => StatusCode::BAD_REQUEST,
                ReportError::Journal(journal) => journal_status(journal),
                ReportError::Overflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Journal(err) => journal_status(err),
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self, status: StatusCode) -> Value {
        // Don't expose internal error details to clients
        if status == StatusCode::SERVICE_UNAVAILABLE {
            let message = match self {
                Self::Checkout(CheckoutError::PersistenceFailure(_)) => {
                    "Could not record the sale"
                }
                _ => "Service temporarily unavailable",
            };
            return json!({ "error": message });
        }
        if status.is_server_error() {
            return json!({ "error": "Internal server error" });
        }

        match self {
            Self::Checkout(CheckoutError::InsufficientStock {
                product_id,
                requested,
                available,
            }) => json!({
                "error": "insufficient stock",
                "product_id": product_id,
                "requested": requested,
                "available": available,
            }),
            Self::Checkout(CheckoutError::ProductNotFound(product_id)) => json!({
                "error": format!("product {product_id} not found"),
                "product_id": product_id,
            }),
            Self::Checkout(err) => json!({ "error": err.to_string() }),
            Self::Report(ReportError::InvalidRange(err)) => json!({ "error": err.to_string() }),
            Self::Database(RepositoryError::NotFound) => json!({ "error": "not found" }),
            Self::Database(
                RepositoryError::Conflict(msg) | RepositoryError::InvalidReference(msg),
            ) => json!({ "error": msg }),
            Self::Validation(err) => json!({ "error": err.to_string() }),
            Self::NotFound(what) => json!({ "error": format!("{what} not found") }),
            Self::BadRequest(msg) => json!({ "error": msg }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

fn journal_status(err: &JournalError) -> StatusCode {
    match err {
        JournalError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        JournalError::DataCorruption(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                status = status.as_u16(),
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(self.body(status))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for a business event.
///
/// Breadcrumbs appear in Sentry error reports to show what happened before
/// an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, Value)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert((*key).to_string(), value.clone());
    }

    sentry::add_breadcrumb(breadcrumb);
}
