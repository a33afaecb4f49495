pub mod config;
pub mod error;

pub use config::{ConfigError, UploadConfig, DEFAULT_MAX_FILE_SIZE, MAX_FILE_SIZE_ENV};
pub use error::FileContentSourceError;
