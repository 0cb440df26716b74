use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email already in use")]
    EmailInUse,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email not verified")]
    EmailNotVerified,

    #[error("Old password incorrect")]
    IncorrectPassword,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("OTP expired")]
    OtpExpired,

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("Too many OTP attempts")]
    TooManyOtpAttempts,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("Missing auth token")]
    MissingToken,

    #[error("Invalid auth token")]
    InvalidToken,

    #[error("Forbidden")]
    Forbidden,

    #[error("Mail error: {0}")]
    Mail(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::EmailInUse => (StatusCode::CONFLICT, "Email already in use".to_string()),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ),
            ApiError::EmailNotVerified => (
                StatusCode::UNAUTHORIZED,
                "Email not verified. Please check your email for the verification OTP.".to_string(),
            ),
            ApiError::IncorrectPassword => (
                StatusCode::UNAUTHORIZED,
                "Old password is incorrect".to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::OtpExpired => (StatusCode::BAD_REQUEST, "OTP code has expired".to_string()),
            ApiError::InvalidOtp => (StatusCode::BAD_REQUEST, "Invalid OTP code".to_string()),
            ApiError::TooManyOtpAttempts => (
                StatusCode::BAD_REQUEST,
                "Too many incorrect OTP attempts. Request a new verification code.".to_string(),
            ),
            ApiError::InvalidResetToken => (
                StatusCode::BAD_REQUEST,
                "Invalid or expired password reset token".to_string(),
            ),
            ApiError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Access denied. No token provided.".to_string(),
            ),
            ApiError::InvalidToken => (StatusCode::BAD_REQUEST, "Invalid token.".to_string()),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "You do not have permission to perform this action".to_string(),
            ),
            ApiError::Mail(msg) => {
                tracing::error!(error = %msg, "email delivery failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send email".to_string(),
                )
            }
            ApiError::Database(msg) => {
                tracing::error!(error = %msg, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(_err: jsonwebtoken::errors::Error) -> Self {
        ApiError::InvalidToken
    }
}
