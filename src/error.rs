use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{repository::RepoError, validation::Issue};

/// Body of 401 responses produced by the token check.
pub const UNAUTHORIZED: &str = "Unauthorized";

/// ApiError
///
/// The closed set of failures a handler can end with. Every layer produces one of
/// these explicitly; `IntoResponse` below is the single place that turns them into
/// HTTP status codes and the `{ "error": ... }` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid token, or a credential mismatch at signin.
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("validation failed with {} issue(s)", .0.len())]
    ValidationFailed(Vec<Issue>),
    /// Carries the resource name, e.g. `"Blog"`.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Carries the entity description, e.g. `"User with this email"`.
    #[error("{0} already exists")]
    Conflict(&'static str),
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// ErrorDetail
///
/// Either a plain message or the list of validation issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(untagged)]
#[ts(export)]
pub enum ErrorDetail {
    Message(String),
    Issues(Vec<Issue>),
}

/// ErrorBody
///
/// The uniform error envelope returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The client-facing body. Store and internal details are replaced with fixed text.
    pub fn body(&self) -> ErrorBody {
        let error = match self {
            ApiError::ValidationFailed(issues) => ErrorDetail::Issues(issues.clone()),
            ApiError::Store(_) => ErrorDetail::Message("Database error".to_string()),
            ApiError::Internal(_) => ErrorDetail::Message("Internal Server Error".to_string()),
            other => ErrorDetail::Message(other.to_string()),
        };
        ErrorBody { error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(detail) => tracing::error!(error = %detail, "store operation failed"),
            ApiError::Internal(detail) => tracing::error!(error = %detail, "unhandled failure"),
            other => tracing::debug!(status = %other.status(), error = %other, "request rejected"),
        }
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<Vec<Issue>> for ApiError {
    fn from(issues: Vec<Issue>) -> Self {
        ApiError::ValidationFailed(issues)
    }
}

/// RepoResultExt
///
/// Names the entity involved when a store result crosses into the handler layer.
pub trait RepoResultExt<T> {
    /// `RepoError::NotFound` becomes `ApiError::NotFound(resource)`.
    fn or_not_found(self, resource: &'static str) -> Result<T, ApiError>;
    /// `RepoError::UniqueViolation` becomes `ApiError::Conflict(entity)`.
    fn or_conflict(self, entity: &'static str) -> Result<T, ApiError>;
}

impl<T> RepoResultExt<T> for Result<T, RepoError> {
    fn or_not_found(self, resource: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| match e {
            RepoError::NotFound => ApiError::NotFound(resource),
            other => other.into(),
        })
    }

    fn or_conflict(self, entity: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| match e {
            RepoError::UniqueViolation(_) => ApiError::Conflict(entity),
            other => other.into(),
        })
    }
}

impl From<RepoError> for ApiError {
    // Without a named entity every store failure is a store error.
    fn from(e: RepoError) -> Self {
        ApiError::Store(e.to_string())
    }
}
