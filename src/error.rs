//! Application error type and its HTTP mapping.
//!
//! Expected outcomes (validation failures, conflicts, missing slugs) are
//! reported as structured `field`/`reason` pairs. Anything unexpected becomes
//! [`AppError::Internal`], whose cause is logged but never sent to the client.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::repositories::StorageError;
use crate::utils::slug_generator::SlugError;

/// A single field-level error reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            reason: reason.into(),
        }
    }

    /// An error not tied to a particular field.
    pub fn general(reason: impl Into<String>) -> Self {
        Self {
            field: None,
            reason: reason.into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    errors: Vec<FieldError>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {}", describe(.errors))]
    Validation { errors: Vec<FieldError> },

    #[error("not found: {}", describe(.errors))]
    NotFound { errors: Vec<FieldError> },

    #[error("conflict: {}", describe(.errors))]
    Conflict { errors: Vec<FieldError> },

    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AppError {
    pub fn bad_request(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            errors: vec![FieldError::new(field, reason)],
        }
    }

    pub fn not_found(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotFound {
            errors: vec![FieldError::new(field, reason)],
        }
    }

    pub fn conflict(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Conflict {
            errors: vec![FieldError::new(field, reason)],
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Internal error carrying its underlying cause.
    pub fn internal_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// HTTP status the request layer reports for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| match &e.field {
            Some(field) => format!("{field} {}", e.reason),
            None => e.reason.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let errors = match self {
            AppError::Validation { errors }
            | AppError::NotFound { errors }
            | AppError::Conflict { errors } => errors,
            AppError::Internal { message, source } => {
                match source {
                    Some(source) => tracing::error!(error = %source, "{message}"),
                    None => tracing::error!("{message}"),
                }
                vec![FieldError::general("internal server error")]
            }
        };

        (status, Json(ErrorBody { errors })).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::internal_with("Storage error", e)
    }
}

impl From<SlugError> for AppError {
    fn from(e: SlugError) -> Self {
        AppError::internal_with("Slug generation failed", e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let mut errors: Vec<FieldError> = e
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let reason = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    FieldError::new(field.to_string(), reason)
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::Validation { errors }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation {
            errors: vec![FieldError::general(rejection.body_text())],
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation {
            errors: vec![FieldError::general(rejection.body_text())],
        }
    }
}
