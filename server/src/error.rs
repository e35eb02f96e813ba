use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;

use crate::auth_token::AuthTokenError;

#[derive(Debug, thiserror::Error)]
pub enum JobBoardError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Document encoding error: {0}")]
    Encoding(#[from] mongodb::bson::ser::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("unauthorized access")]
    Unauthorized,

    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Session token error: {0}")]
    Token(#[from] AuthTokenError),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl ResponseError for JobBoardError {
    fn status_code(&self) -> StatusCode {
        match self {
            JobBoardError::Unauthorized => StatusCode::UNAUTHORIZED,
            JobBoardError::InvalidId(_) => StatusCode::BAD_REQUEST,
            JobBoardError::BadRequest(_) => StatusCode::BAD_REQUEST,
            JobBoardError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            JobBoardError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
            JobBoardError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            JobBoardError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            JobBoardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            message: self.to_string(),
        })
    }
}

pub type Result<T> = std::result::Result<T, JobBoardError>;
