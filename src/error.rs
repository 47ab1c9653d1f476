use std::error::Error;

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{article::error::StoreError, mirror::error::MirrorError};

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Article not found")]
    ArticleNotFound,

    #[error("No image data provided")]
    MissingImageData,

    #[error("Invalid image filename '{0}'")]
    InvalidFilename(String),

    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("Error encountered reading or saving articles")]
    Store(#[from] StoreError),

    #[error("Error encountered uploading to remote repository")]
    Mirror(#[from] MirrorError),
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = match &self {
            RestError::ArticleNotFound => StatusCode::NOT_FOUND,
            RestError::MissingImageData => StatusCode::BAD_REQUEST,
            RestError::InvalidFilename(_) => StatusCode::BAD_REQUEST,
            RestError::Body(rejection) => rejection.status(),
            RestError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::Mirror(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("{}: {:?}", self, self.source());
        }

        let payload = Json(json!({"error": self.to_string()}));

        (status, payload).into_response()
    }
}
