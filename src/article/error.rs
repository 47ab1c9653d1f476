use std::io;

use thiserror::Error;

use crate::mirror::error::MirrorError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error accessing article file")]
    Io(#[from] io::Error),

    #[error("Article file is not valid JSON")]
    Parse(#[from] serde_json::Error),

    #[error("Saved locally but failed to push to remote mirror")]
    Mirror(#[from] MirrorError),
}
