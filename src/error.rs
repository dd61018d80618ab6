use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::models::session::SessionError;
use crate::utils::json_extract::ExtractError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid request body: {0}")]
    JsonRejection(#[from] JsonRejection),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Model service error: {0}")]
    Upstream(String),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Could not parse quiz data: {0}")]
    Extract(#[from] ExtractError),

    #[error("No valid questions were generated")]
    EmptyQuiz,

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::JsonRejection(err) => (StatusCode::BAD_REQUEST, err.body_text()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            Error::Reqwest(err) => (
                StatusCode::BAD_GATEWAY,
                format!("External service error: {}", err),
            ),
            Error::Session(err) => (StatusCode::CONFLICT, err.to_string()),
            Error::Extract(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::EmptyQuiz => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "No valid questions were generated".to_string(),
            ),
            Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
