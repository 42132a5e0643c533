use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Template not found with id: {0}")]
    TemplateNotFound(i64),

    #[error("Resume not found with id: {0}")]
    ResumeNotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::TemplateNotFound(_) => {
                (StatusCode::NOT_FOUND, "TEMPLATE_NOT_FOUND", self.to_string())
            }
            AppError::ResumeNotFound(_) => {
                (StatusCode::NOT_FOUND, "RESUME_NOT_FOUND", self.to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_variants_map_to_404() {
        assert_eq!(
            AppError::TemplateNotFound(5).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ResumeNotFound(9).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_error_is_masked_as_500() {
        let err = AppError::Internal(anyhow::anyhow!("connection reset"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_messages_carry_the_missing_id() {
        assert_eq!(
            AppError::TemplateNotFound(42).to_string(),
            "Template not found with id: 42"
        );
        assert_eq!(
            AppError::ResumeNotFound(7).to_string(),
            "Resume not found with id: 7"
        );
    }
}
