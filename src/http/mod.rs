//! HTTP surface: application state and the `/api` route table.

pub mod handlers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::article::{ArticleStore, CategoryImages};
use crate::mirror::Mirror;

/// Default request body limit. Images arrive base64 encoded inside JSON.
pub const DEFAULT_BODY_LIMIT: usize = 50 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ArticleStore>,
    pub mirror: Arc<dyn Mirror>,
    pub images: Arc<CategoryImages>,
}

impl AppState {
    pub fn new(store: ArticleStore, mirror: Arc<dyn Mirror>, images: CategoryImages) -> Self {
        Self {
            store: Arc::new(store),
            mirror,
            images: Arc::new(images),
        }
    }
}

pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/articles",
            get(handlers::list_articles).post(handlers::create_article),
        )
        .route(
            "/api/articles/{id}",
            get(handlers::get_article)
                .put(handlers::update_article)
                .delete(handlers::delete_article),
        )
        .route("/api/upload-image", post(handlers::upload_image))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
