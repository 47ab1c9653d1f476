use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::mirror::{decode_image, error::MirrorError, raw_image_url, Mirror};

const RAW_URL: &str = "https://raw.githubusercontent.com";

#[derive(Debug, Clone, PartialEq)]
pub struct PushedDocument {
    pub document: Vec<u8>,
    pub message: String,
}

/// In-memory mirror. Records every push instead of talking to a remote.
#[derive(Debug, Default)]
pub struct RecordingMirror {
    documents: Mutex<Vec<PushedDocument>>,
    images: Mutex<HashMap<String, Vec<u8>>>,
    fail: bool,
}

impl RecordingMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mirror whose every push fails, for exercising error paths.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn documents(&self) -> Vec<PushedDocument> {
        self.documents.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last_document(&self) -> Option<PushedDocument> {
        self.documents().pop()
    }

    pub fn image(&self, filename: &str) -> Option<Vec<u8>> {
        self.images
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(filename)
            .cloned()
    }

    pub fn image_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .images
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    fn check(&self) -> Result<(), MirrorError> {
        if self.fail {
            return Err(MirrorError::Config("recording mirror set to fail".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Mirror for RecordingMirror {
    async fn push_document(&self, document: &[u8], message: &str) -> Result<(), MirrorError> {
        self.check()?;
        debug!("recorded document push: {message}");

        self.documents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(PushedDocument {
                document: document.to_vec(),
                message: message.to_string(),
            });
        Ok(())
    }

    async fn push_image(&self, payload: &str, filename: &str) -> Result<String, MirrorError> {
        self.check()?;
        let bytes = decode_image(payload)?;
        debug!("recorded image push: {filename} ({} bytes)", bytes.len());

        self.images
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(filename.to_string(), bytes);

        raw_image_url(RAW_URL, "local", "articles", "main", filename)
    }
}
