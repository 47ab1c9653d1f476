use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored blog article.
///
/// Text fields are optional because updates replace them with whatever the
/// request carried, including nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: Option<String>,
    pub category: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub image: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub views: u64,
}

/// Body of create and update requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInput {
    pub title: Option<String>,
    pub category: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub custom_image_url: Option<String>,
    pub image_data: Option<String>,
}

impl ArticleInput {
    pub fn custom_image_url(&self) -> Option<&str> {
        non_empty(self.custom_image_url.as_deref())
    }

    pub fn image_data(&self) -> Option<&str> {
        non_empty(self.image_data.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageRequest {
    pub image_data: Option<String>,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageResponse {
    pub image_url: String,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl Article {
    /// Builds a fresh article from a create request.
    pub fn new(id: String, input: ArticleInput, image: String, date: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            category: input.category,
            excerpt: input.excerpt,
            content: input.content,
            image,
            date,
            views: 0,
        }
    }

    /// Replaces every editable field from `input`. Identifier and view
    /// counter are kept; the image is only replaced when `image` is `Some`.
    pub fn apply_update(&mut self, input: ArticleInput, image: Option<String>, now: DateTime<Utc>) {
        self.title = input.title;
        self.category = input.category;
        self.excerpt = input.excerpt;
        self.content = input.content;
        if let Some(image) = image {
            self.image = image;
        }

        // timestamps must move forward even if the clock has not
        let floor = self.date + chrono::Duration::milliseconds(1);
        self.date = now.max(floor);
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("untitled")
    }
}
