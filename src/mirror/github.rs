use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{header, Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::mirror::{
    config::GitHubConfig, decode_image, error::MirrorError, join_segments,
    raw_image_url, Mirror, DOCUMENT_PATH, IMAGE_DIR,
};

const USER_AGENT: &str = concat!("article-mirror/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ContentMeta {
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutContent<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

/// Mirror backed by the GitHub repository contents API.
pub struct GitHubMirror {
    config: GitHubConfig,
    client: Client,
}

impl GitHubMirror {
    pub fn new(config: GitHubConfig) -> Result<Self, MirrorError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { config, client })
    }

    /// Contents API URL for a repository path, each segment percent-encoded.
    fn contents_url(&self, path: &[&str]) -> Result<Url, MirrorError> {
        let owner = self.config.owner.as_str();
        let repo = self.config.repo.as_str();

        let segments = ["repos", owner, repo, "contents"]
            .into_iter()
            .chain(path.iter().copied());
        join_segments(&self.config.api_url, segments)
    }

    /// Looks up the SHA of an existing remote file.
    ///
    /// Any failure, including transport errors, is treated as "file does not
    /// exist" so the following write becomes a create.
    async fn current_sha(&self, url: &Url, path: &str) -> Option<String> {
        let response = self
            .client
            .get(url.clone())
            .query(&[("ref", self.config.branch.as_str())])
            .bearer_auth(&self.config.token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await;

        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!("no existing sha for {path} (status {})", response.status());
                return None;
            }
            Err(e) => {
                debug!("sha lookup for {path} failed: {e}");
                return None;
            }
        };

        match response.json::<ContentMeta>().await {
            Ok(meta) => Some(meta.sha),
            Err(e) => {
                debug!("unexpected contents response for {path}: {e}");
                None
            }
        }
    }

    async fn put_file(
        &self,
        segments: &[&str],
        bytes: &[u8],
        message: &str,
    ) -> Result<(), MirrorError> {
        let path = segments.join("/");
        let url = self.contents_url(segments)?;
        let sha = self.current_sha(&url, &path).await;
        let action = if sha.is_some() { "updating" } else { "creating" };
        debug!("{action} {path} on {}", self.config.branch);

        let body = PutContent {
            message,
            content: STANDARD.encode(bytes),
            branch: &self.config.branch,
            sha,
        };

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.config.token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MirrorError::Rejected {
                path,
                status,
                body,
            });
        }

        info!("pushed {path} ({} bytes): {message}", bytes.len());
        Ok(())
    }
}

#[async_trait]
impl Mirror for GitHubMirror {
    async fn push_document(&self, document: &[u8], message: &str) -> Result<(), MirrorError> {
        self.put_file(&[DOCUMENT_PATH], document, message).await
    }

    async fn push_image(&self, payload: &str, filename: &str) -> Result<String, MirrorError> {
        let bytes = decode_image(payload)?;
        let message = format!("Upload image: {filename}");

        self.put_file(&[IMAGE_DIR, filename], &bytes, &message).await?;

        raw_image_url(
            &self.config.raw_url,
            &self.config.owner,
            &self.config.repo,
            &self.config.branch,
            filename,
        )
    }
}
