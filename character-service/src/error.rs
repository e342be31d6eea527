use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::character::Message;

/// Failures the router reports to clients. Each renders as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Character not found")]
    CharacterNotFound,
    #[error("Route not found")]
    RouteNotFound,
    #[error("invalid character id '{0}': expected a non-negative integer")]
    InvalidId(String),
    #[error("malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::CharacterNotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::InvalidId(_) | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(Message::new(self.to_string()))).into_response()
    }
}
