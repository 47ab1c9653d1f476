use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::article::error::StoreError;

pub const TECHNOLOGY: &str = "technology";

const BUILTIN: &[(&str, &str)] = &[
    (
        TECHNOLOGY,
        "https://images.unsplash.com/photo-1518770660439-4636190af475?w=800&q=80",
    ),
    (
        "ai",
        "https://images.unsplash.com/photo-1677442136019-21780ecad995?w=800&q=80",
    ),
    (
        "programming",
        "https://images.unsplash.com/photo-1515879218367-8466d910aaa4?w=800&q=80",
    ),
    (
        "web",
        "https://images.unsplash.com/photo-1547658719-da2b51169166?w=800&q=80",
    ),
    (
        "mobile",
        "https://images.unsplash.com/photo-1512941937669-90a1b58e7e9c?w=800&q=80",
    ),
    (
        "cloud",
        "https://images.unsplash.com/photo-1544197150-b99a580bb7a8?w=800&q=80",
    ),
    (
        "security",
        "https://images.unsplash.com/photo-1550751827-4bd374c3f58b?w=800&q=80",
    ),
    (
        "data",
        "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=800&q=80",
    ),
];

/// Default article image per category.
///
/// Unknown categories fall back to the technology image.
#[derive(Debug, Clone)]
pub struct CategoryImages {
    images: HashMap<String, String>,
}

impl Default for CategoryImages {
    fn default() -> Self {
        Self {
            images: BUILTIN
                .iter()
                .map(|(category, url)| (category.to_string(), url.to_string()))
                .collect(),
        }
    }
}

impl CategoryImages {
    /// Built-in table with entries from a JSON object file merged on top.
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path)?;
        let overrides: HashMap<String, String> = serde_json::from_str(&raw)?;
        debug!("loaded {} category image overrides", overrides.len());

        Ok(Self::default().with_overrides(overrides))
    }

    pub fn with_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        for (category, url) in overrides {
            self.images.insert(category.to_lowercase(), url);
        }
        self
    }

    pub fn get(&self, category: &str) -> Option<&str> {
        self.images
            .get(&category.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn fallback(&self) -> &str {
        self.images
            .get(TECHNOLOGY)
            .map(String::as_str)
            .unwrap_or(BUILTIN[0].1)
    }

    pub fn resolve(&self, category: Option<&str>) -> &str {
        category
            .and_then(|c| self.get(c))
            .unwrap_or_else(|| self.fallback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_known_category() {
        let images = CategoryImages::default();
        assert_eq!(images.resolve(Some("ai")), images.get("ai").unwrap());
        assert_eq!(images.resolve(Some(" AI ")), images.get("ai").unwrap());
        assert_ne!(images.resolve(Some("ai")), images.fallback());
    }

    #[test]
    fn test_unknown_category_falls_back_to_technology() {
        let images = CategoryImages::default();
        assert_eq!(images.resolve(Some("gardening")), images.get(TECHNOLOGY).unwrap());
        assert_eq!(images.resolve(None), images.get(TECHNOLOGY).unwrap());
    }

    #[test]
    fn test_overrides_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Gardening": "https://example.com/g.jpg", "ai": "https://example.com/ai.jpg"}}"#).unwrap();

        let images = CategoryImages::from_file(file.path()).unwrap();
        assert_eq!(images.resolve(Some("gardening")), "https://example.com/g.jpg");
        assert_eq!(images.resolve(Some("ai")), "https://example.com/ai.jpg");
        assert!(images.get("cloud").is_some());
    }

    #[test]
    fn test_malformed_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2").unwrap();

        assert!(matches!(
            CategoryImages::from_file(file.path()),
            Err(StoreError::Parse(_))
        ));
    }
}
