//! Image filename policy for uploaded article images.

/// File extension for an uploaded payload. Only a declared PNG data URL
/// yields `png`; the bytes themselves are never inspected.
pub fn extension(payload: &str) -> &'static str {
    if payload.contains("data:image/png") {
        "png"
    } else {
        "jpg"
    }
}

/// Filename for an image uploaded while creating an article.
pub fn create_filename(epoch_millis: i64, payload: &str) -> String {
    format!("article-{epoch_millis}.{}", extension(payload))
}

/// Filename for an image uploaded while updating article `id`.
pub fn update_filename(id: &str, payload: &str) -> String {
    format!("article-{id}-updated.{}", extension(payload))
}

/// Filename for a standalone upload that did not name one.
pub fn upload_filename(epoch_millis: i64, payload: &str) -> String {
    format!("image-{epoch_millis}.{}", extension(payload))
}
