//! Vidshare: API error types.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};
use vidshare_core::error::DomainError;
use vidshare_core::identity::IdentityError;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    /// Tracing or exporter setup failure.
    #[error("telemetry error: {0}")]
    Telemetry(String),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer error that implements `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// A failure raised by a command or query handler.
    Domain(DomainError),
    /// The request carried no usable credential.
    Unauthorized(IdentityError),
    /// The path or body could not be decoded.
    Rejected {
        /// Status chosen by the failing extractor (400, 415 or 422).
        status: StatusCode,
        /// `invalid_path` or `invalid_body`.
        code: &'static str,
        /// What was wrong with the input.
        message: String,
    },
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        Self::Unauthorized(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            code: "invalid_body",
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            code: "invalid_path",
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            Self::Unauthorized(err) => {
                warn!(error = %err, "rejected request credential");
                (
                    StatusCode::UNAUTHORIZED,
                    "unauthorized",
                    "a valid bearer token is required".to_owned(),
                )
            }
            Self::Rejected {
                status,
                code,
                message,
            } => {
                debug!(%status, code, %message, "request rejected by extractor");
                (*status, *code, message.clone())
            }
            Self::Domain(err) => match err {
                DomainError::AggregateNotFound(id) => (
                    StatusCode::NOT_FOUND,
                    "not_found",
                    format!("video {id} not found"),
                ),
                DomainError::CommentNotFound { .. } => {
                    (StatusCode::NOT_FOUND, "not_found", err.to_string())
                }
                DomainError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden", err.to_string()),
                DomainError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, "validation_error", err.to_string())
                }
                DomainError::ConcurrencyConflict { .. } => {
                    warn!(error = %err, "concurrent modification rejected");
                    (
                        StatusCode::CONFLICT,
                        "concurrency_conflict",
                        "the video was modified concurrently; reload and retry".to_owned(),
                    )
                }
                DomainError::Timeout { .. } => {
                    error!(error = %err, "persistence timeout");
                    (
                        StatusCode::GATEWAY_TIMEOUT,
                        "persistence_timeout",
                        "the request could not be completed in time".to_owned(),
                    )
                }
                DomainError::Infrastructure(_) => {
                    error!(error = %err, "infrastructure failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "infrastructure_error",
                        "internal server error".to_owned(),
                    )
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = self.parts();

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::time::Duration;
    use uuid::Uuid;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        let response = err.into().into_response();
        response.status()
    }

    async fn body_of(err: impl Into<ApiError>) -> serde_json::Value {
        let response = err.into().into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_aggregate_not_found_maps_to_404() {
        let id = Uuid::new_v4();
        assert_eq!(
            status_of(DomainError::AggregateNotFound(id)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_comment_not_found_maps_to_404() {
        assert_eq!(
            status_of(DomainError::CommentNotFound {
                video_id: Uuid::new_v4(),
                comment_id: Uuid::new_v4(),
            }),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        assert_eq!(
            status_of(DomainError::Forbidden("not yours".into())),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_concurrency_conflict_maps_to_409() {
        assert_eq!(
            status_of(DomainError::ConcurrencyConflict {
                aggregate_id: Uuid::new_v4(),
                expected: 1,
                actual: 2,
            }),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(DomainError::Validation("bad input".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_identity_error_maps_to_401() {
        assert_eq!(
            status_of(IdentityError::MissingCredential),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_timeout_maps_to_504_with_generic_message() {
        let timeout = || DomainError::Timeout {
            operation: "load_events",
            after: Duration::from_secs(5),
        };
        assert_eq!(status_of(timeout()), StatusCode::GATEWAY_TIMEOUT);

        let json = body_of(timeout()).await;

        assert_eq!(json["error"], "persistence_timeout");
        assert!(!json["message"].as_str().unwrap().contains("load_events"));
    }

    #[tokio::test]
    async fn test_infrastructure_maps_to_500_without_leaking_detail() {
        let err = DomainError::Infrastructure("connection refused (10.0.0.5:5432)".into());

        let json = body_of(err).await;

        assert_eq!(json["error"], "infrastructure_error");
        assert_eq!(json["message"], "internal server error");
        assert_eq!(
            status_of(DomainError::Infrastructure("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_invalid_credential_detail_is_not_echoed() {
        let json = body_of(IdentityError::InvalidCredential("ExpiredSignature".into())).await;

        assert_eq!(json["error"], "unauthorized");
        assert!(!json["message"].as_str().unwrap().contains("Expired"));
    }

    #[tokio::test]
    async fn test_rejection_keeps_status_and_uses_error_body() {
        let err = ApiError::Rejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            code: "invalid_body",
            message: "missing field `text`".into(),
        };

        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "invalid_body");
        assert_eq!(json["message"], "missing field `text`");
    }
}
