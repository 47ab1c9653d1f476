use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::article::{error::StoreError, types::Article};
use crate::mirror::Mirror;

/// The article collection as a single JSON document on disk, mirrored to
/// the remote repository on every save.
///
/// Nothing is cached: each request loads the whole file and writes it back.
/// Concurrent writers race and the last save wins.
pub struct ArticleStore {
    path: PathBuf,
    mirror: Arc<dyn Mirror>,
}

impl ArticleStore {
    pub fn new(path: impl Into<PathBuf>, mirror: Arc<dyn Mirror>) -> Self {
        Self {
            path: path.into(),
            mirror,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the collection. A missing or unreadable file is an empty
    /// collection; malformed JSON is an error.
    pub async fn load(&self) -> Result<Vec<Article>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} does not exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!("could not read {}: {e}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let articles: Vec<Article> = serde_json::from_str(&raw)?;
        debug!("loaded {} articles from {}", articles.len(), self.path.display());
        Ok(articles)
    }

    /// Overwrites the local file, then pushes the same document upstream.
    ///
    /// A failed push leaves the local write in place.
    pub async fn save(&self, articles: &[Article], description: &str) -> Result<(), StoreError> {
        let document = serde_json::to_vec_pretty(articles)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, &document).await?;
        info!(
            "wrote {} articles to {}: {description}",
            articles.len(),
            self.path.display()
        );

        self.mirror.push_document(&document, description).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::RecordingMirror;
    use chrono::Utc;
    use tempfile::TempDir;

    fn article(id: &str) -> Article {
        Article {
            id: id.to_string(),
            title: Some(format!("title {id}")),
            category: Some("ai".to_string()),
            excerpt: None,
            content: Some("body".to_string()),
            image: "https://example.com/a.jpg".to_string(),
            date: Utc::now(),
            views: 0,
        }
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = ArticleStore::new(dir.path().join("nope.json"), Arc::new(RecordingMirror::new()));

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_unreadable_file_is_empty() {
        let dir = TempDir::new().unwrap();
        // a directory exists at the path but cannot be read as a file
        let store = ArticleStore::new(dir.path(), Arc::new(RecordingMirror::new()));

        assert_eq!(store.load().await.unwrap(), Vec::<Article>::new());
    }

    #[tokio::test]
    async fn test_load_malformed_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("articles.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = ArticleStore::new(&path, Arc::new(RecordingMirror::new()));

        assert!(matches!(store.load().await, Err(StoreError::Parse(_))));
    }

    #[tokio::test]
    async fn test_save_writes_pretty_json_and_pushes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("articles.json");
        let mirror = Arc::new(RecordingMirror::new());
        let store = ArticleStore::new(&path, mirror.clone());

        let articles = vec![article("b"), article("a")];
        store.save(&articles, "Add article: title b").await.unwrap();

        let on_disk = std::fs::read(&path).unwrap();
        assert!(String::from_utf8_lossy(&on_disk).contains("\n  {"));

        let pushed = mirror.last_document().unwrap();
        assert_eq!(pushed.document, on_disk);
        assert_eq!(pushed.message, "Add article: title b");

        assert_eq!(store.load().await.unwrap(), articles);
    }

    #[tokio::test]
    async fn test_failed_push_keeps_local_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("articles.json");
        let store = ArticleStore::new(&path, Arc::new(RecordingMirror::failing()));

        let result = store.save(&[article("a")], "Add article").await;

        assert!(matches!(result, Err(StoreError::Mirror(_))));
        assert_eq!(store.load().await.unwrap().len(), 1);
    }
}
