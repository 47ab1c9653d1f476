use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Error reading mirror config from environment: {0}")]
    Config(String),

    #[error("Error communicating with remote repository")]
    Http(#[from] reqwest::Error),

    #[error("Remote repository rejected write to '{path}' ({status}): {body}")]
    Rejected {
        path: String,
        status: StatusCode,
        body: String,
    },

    #[error("Image payload is not valid base64")]
    InvalidImage(#[from] base64::DecodeError),
}
