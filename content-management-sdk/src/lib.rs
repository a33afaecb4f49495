pub mod common;
pub mod models;

pub use common::{ConfigError, FileContentSourceError, UploadConfig};
pub use models::*;
