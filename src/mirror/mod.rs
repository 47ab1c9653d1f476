//! Remote mirror of the article collection.
//!
//! The article document and uploaded images are pushed to a hosted
//! source-control repository. [`GitHubMirror`] talks to the GitHub contents
//! API; [`RecordingMirror`] keeps everything in memory for tests and
//! offline runs.

pub mod config;
pub mod error;
pub mod github;
pub mod mock;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Url;

pub use config::GitHubConfig;
pub use error::MirrorError;
pub use github::GitHubMirror;
pub use mock::RecordingMirror;

/// Remote path of the mirrored article document.
pub const DOCUMENT_PATH: &str = "articles.json";

/// Remote directory uploaded images are written to.
pub const IMAGE_DIR: &str = "images";

#[async_trait]
pub trait Mirror: Send + Sync {
    /// Create or overwrite the remote article document.
    async fn push_document(&self, document: &[u8], message: &str) -> Result<(), MirrorError>;

    /// Write an image under [`IMAGE_DIR`] and return its public URL.
    ///
    /// `payload` is base64, optionally wrapped in a `data:` URL.
    async fn push_image(&self, payload: &str, filename: &str) -> Result<String, MirrorError>;
}

/// Public URL of an uploaded image. `filename` is percent-encoded so the
/// URL names the same file the contents API wrote.
pub fn raw_image_url(
    raw_url: &str,
    owner: &str,
    repo: &str,
    branch: &str,
    filename: &str,
) -> Result<String, MirrorError> {
    let url = join_segments(raw_url, [owner, repo, branch, IMAGE_DIR, filename])?;
    Ok(url.into())
}

/// Appends `segments` to `base`, percent-encoding each one.
pub(crate) fn join_segments<'a>(
    base: &str,
    segments: impl IntoIterator<Item = &'a str>,
) -> Result<Url, MirrorError> {
    let mut url =
        Url::parse(base).map_err(|e| MirrorError::Config(format!("invalid base url '{base}': {e}")))?;

    url.path_segments_mut()
        .map_err(|_| MirrorError::Config(format!("base url '{base}' cannot take a path")))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Removes a leading `data:<mime>;base64,` prefix if present.
pub fn strip_data_url(payload: &str) -> &str {
    match payload.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(payload, |(_, data)| data),
        None => payload,
    }
}

pub fn decode_image(payload: &str) -> Result<Vec<u8>, MirrorError> {
    let data: String = strip_data_url(payload)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    Ok(STANDARD.decode(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_data_url() {
        assert_eq!(strip_data_url("data:image/png;base64,iVBORw0K"), "iVBORw0K");
        assert_eq!(strip_data_url("data:image/jpeg;base64,/9j/4AAQ"), "/9j/4AAQ");
        assert_eq!(strip_data_url("iVBORw0K"), "iVBORw0K");
        // no comma, nothing to strip
        assert_eq!(strip_data_url("data:broken"), "data:broken");
    }

    #[test]
    fn test_decode_image() {
        assert_eq!(decode_image("data:image/png;base64,aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode_image("aGVs\nbG8=").unwrap(), b"hello");
        assert!(matches!(
            decode_image("data:image/png;base64,not base64!"),
            Err(MirrorError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_raw_image_url() {
        assert_eq!(
            raw_image_url("https://raw.githubusercontent.com/", "acme", "blog", "main", "a.png")
                .unwrap(),
            "https://raw.githubusercontent.com/acme/blog/main/images/a.png"
        );
        assert_eq!(
            raw_image_url("https://cdn.example.com/raw", "acme", "blog", "main", "cover?v=2#x.png")
                .unwrap(),
            "https://cdn.example.com/raw/acme/blog/main/images/cover%3Fv=2%23x.png"
        );
        assert!(matches!(
            raw_image_url("not a url", "acme", "blog", "main", "a.png"),
            Err(MirrorError::Config(_))
        ));
    }
}
