pub mod article;
pub mod error;
pub mod http;
pub mod mirror;

pub use error::RestError;
