use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use common::{
    error::{StoreError, ValidationError},
    utils::ApiResponse,
};
use thiserror::Error;

/// Failures surfaced to HTTP callers as `{"status": "error", "message": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Please fill in all required fields")]
    MissingFields(#[from] ValidationError),

    #[error("Too many submissions, please try again later")]
    RateLimited,

    #[error("{0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::error(self.to_string()))
    }
}
