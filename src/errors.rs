use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use derive_more::Display;

use crate::constants::{
    GENERIC_ERROR_MESSAGE, RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER,
};
use crate::entities::submission::ContactResponse;

#[derive(Debug, Display)]
pub enum AppError {
    #[display("Method not allowed")]
    MethodNotAllowed { allow: &'static str },

    #[display("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64, limit: u32 },

    #[display("Payload too large")]
    PayloadTooLarge,

    #[display("Forbidden: {_0}")]
    Forbidden(String),

    #[display("Bad request: {_0}")]
    BadRequest(String),

    #[display("Internal server error: {_0}")]
    InternalError(String),
}

impl AppError {
    /// Message safe to send across the trust boundary.
    pub fn public_message(&self) -> String {
        match self {
            AppError::MethodNotAllowed { .. } => "Method not allowed".to_string(),
            AppError::RateLimited { .. } => {
                "Too many submissions. Please try again later.".to_string()
            }
            AppError::PayloadTooLarge => "Request payload too large".to_string(),
            AppError::Forbidden(msg) | AppError::BadRequest(msg) => msg.clone(),
            AppError::InternalError(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());

        match self {
            AppError::MethodNotAllowed { allow } => {
                builder.insert_header((header::ALLOW, *allow));
            }
            AppError::RateLimited { retry_after_secs, limit } => {
                builder
                    .insert_header((header::RETRY_AFTER, retry_after_secs.to_string()))
                    .insert_header((RATE_LIMIT_LIMIT_HEADER, limit.to_string()))
                    .insert_header((RATE_LIMIT_REMAINING_HEADER, "0"));
            }
            AppError::InternalError(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
            }
            _ => {}
        }

        builder.json(ContactResponse::failure(self.public_message()))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalError(format!("Database error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::InternalError(format!("Relay request error: {}", err))
    }
}
