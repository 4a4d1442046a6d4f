use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// 对外统一的通用失败提示，底层原因只写日志
pub const GENERIC_FAILURE: &str = "Your request could not be processed. Please try again.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Duplicate error: {0}")]
    DuplicateError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::ValidationError(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::DuplicateError(msg) => {
                (StatusCode::BAD_REQUEST, "DUPLICATE_ERROR", msg.clone())
            }
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, "AUTH_ERROR", msg.clone()),
            AppError::JwtError(_) => (
                StatusCode::UNAUTHORIZED,
                "AUTH_ERROR",
                "Invalid access token".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "You are not allowed to make this request.".to_string(),
            ),
            _ => (
                StatusCode::BAD_REQUEST,
                "REQUEST_FAILED",
                GENERIC_FAILURE.to_string(),
            ),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::ValidationError(msg) | AppError::DuplicateError(msg) => {
                log::warn!("Rejected request: {msg}");
            }
            AppError::AuthError(msg) => log::warn!("Authentication error: {msg}"),
            AppError::JwtError(err) => log::warn!("JWT error: {err}"),
            AppError::Forbidden => log::warn!("Forbidden access"),
            AppError::NotFound(msg) => log::debug!("Not found: {msg}"),
            AppError::DatabaseError(err) => log::error!("Database error: {err}"),
            _ => log::error!("Request failed: {self}"),
        }

        let (status_code, error_code, message) = self.parts();
        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_and_duplicate_are_bad_request() {
        let err = AppError::ValidationError("You must enter sku.".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.parts().2, "You must enter sku.");

        let err = AppError::DuplicateError("Slug is already in use.".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.parts().1, "DUPLICATE_ERROR");
    }

    #[test]
    fn test_database_error_is_hidden() {
        let err = AppError::DatabaseError(sea_orm::DbErr::Custom(
            "UNIQUE constraint failed: products.sku".to_string(),
        ));
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "REQUEST_FAILED");
        assert_eq!(message, GENERIC_FAILURE);
    }

    #[test]
    fn test_not_found_and_auth_codes() {
        assert_eq!(
            AppError::NotFound("No product found.".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::AuthError("Missing access token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }
}
