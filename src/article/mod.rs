pub mod category;
pub mod error;
pub mod image;
pub mod store;
pub mod types;

pub use category::CategoryImages;
pub use error::StoreError;
pub use store::ArticleStore;
pub use types::{Article, ArticleInput, UploadImageRequest, UploadImageResponse};
