use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::article::{image, Article, ArticleInput, UploadImageRequest, UploadImageResponse};
use crate::error::RestError;
use crate::http::AppState;
use crate::mirror::error::MirrorError;

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<Article>>, RestError> {
    let articles = state.store.load().await?;
    Ok(Json(articles))
}

pub async fn get_article(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Article>, RestError> {
    debug!("looking up article {id}");

    let article = state
        .store
        .load()
        .await?
        .into_iter()
        .find(|a| a.id == id)
        .ok_or(RestError::ArticleNotFound)?;

    Ok(Json(article))
}

pub async fn create_article(
    State(state): State<AppState>,
    payload: Result<Json<ArticleInput>, JsonRejection>,
) -> Result<impl IntoResponse, RestError> {
    let Json(input) = payload?;
    let mut articles = state.store.load().await?;

    let now = Utc::now();
    let image = match new_image(&state, &input, |data| {
        image::create_filename(now.timestamp_millis(), data)
    })
    .await?
    {
        Some(image) => image,
        None => state.images.resolve(input.category.as_deref()).to_string(),
    };

    let article = Article::new(Uuid::new_v4().to_string(), input, image, now);
    info!("creating article {} ({})", article.id, article.display_title());

    let message = format!("Add article: {}", article.display_title());
    articles.insert(0, article.clone());
    state.store.save(&articles, &message).await?;

    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn update_article(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<ArticleInput>, JsonRejection>,
) -> Result<Json<Article>, RestError> {
    let Json(input) = payload?;
    let mut articles = state.store.load().await?;

    let index = articles
        .iter()
        .position(|a| a.id == id)
        .ok_or(RestError::ArticleNotFound)?;

    let image = new_image(&state, &input, |data| image::update_filename(&id, data)).await?;

    let article = &mut articles[index];
    article.apply_update(input, image, Utc::now());
    let article = article.clone();
    info!("updating article {} ({})", article.id, article.display_title());

    let message = format!("Update article: {}", article.display_title());
    state.store.save(&articles, &message).await?;

    Ok(Json(article))
}

pub async fn delete_article(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, RestError> {
    let mut articles = state.store.load().await?;

    let index = articles
        .iter()
        .position(|a| a.id == id)
        .ok_or(RestError::ArticleNotFound)?;

    let removed = articles.remove(index);
    info!("deleting article {} ({})", removed.id, removed.display_title());

    let message = format!("Delete article: {}", removed.display_title());
    state.store.save(&articles, &message).await?;

    Ok(Json(json!({"message": "Article deleted successfully"})))
}

pub async fn upload_image(
    State(state): State<AppState>,
    payload: Result<Json<UploadImageRequest>, JsonRejection>,
) -> Result<Json<UploadImageResponse>, RestError> {
    let Json(request) = payload?;

    let data = request
        .image_data
        .filter(|data| !data.trim().is_empty())
        .ok_or(RestError::MissingImageData)?;

    let filename = match request.filename.as_deref().map(base_name) {
        Some(name) if !name.is_empty() => valid_filename(name)?.to_string(),
        _ => image::upload_filename(Utc::now().timestamp_millis(), &data),
    };

    let image_url = state.mirror.push_image(&data, &filename).await?;
    info!("uploaded image {filename}");

    Ok(Json(UploadImageResponse { image_url }))
}

/// Image chosen by the request itself: a custom URL wins over uploaded
/// data. `None` means the request supplied neither.
async fn new_image(
    state: &AppState,
    input: &ArticleInput,
    filename: impl FnOnce(&str) -> String,
) -> Result<Option<String>, MirrorError> {
    if let Some(url) = input.custom_image_url() {
        return Ok(Some(url.to_string()));
    }

    match input.image_data() {
        Some(data) => {
            let name = filename(data);
            state.mirror.push_image(data, &name).await.map(Some)
        }
        None => Ok(None),
    }
}

/// Last path segment, so uploads cannot escape the image directory.
fn base_name(filename: &str) -> &str {
    filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
        .trim()
}

fn valid_filename(name: &str) -> Result<&str, RestError> {
    if name == "." || name == ".." || name.chars().any(char::is_control) {
        return Err(RestError::InvalidFilename(name.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_filename() {
        assert_eq!(valid_filename("cover?v=2.png").unwrap(), "cover?v=2.png");
        assert!(valid_filename("..").is_err());
        assert!(valid_filename(".").is_err());
        assert!(valid_filename("a\nb.png").is_err());
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("cover.png"), "cover.png");
        assert_eq!(base_name("../../etc/cover.png"), "cover.png");
        assert_eq!(base_name("a\\b.jpg"), "b.jpg");
        assert_eq!(base_name("dir/"), "");
    }
}
