//! Configuration for asset uploads

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// 最大ファイルサイズを上書きする環境変数
pub const MAX_FILE_SIZE_ENV: &str = "CONTENT_MANAGEMENT_MAX_FILE_SIZE";

/// アセットのバイナリ上限 (100 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Upload configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum number of bytes read from a single file content source
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

impl UploadConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 環境変数 `CONTENT_MANAGEMENT_MAX_FILE_SIZE` から設定を生成する
    ///
    /// 未設定の場合はデフォルト値を使用します。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_value(std::env::var(MAX_FILE_SIZE_ENV).ok())
    }

    fn from_env_value(value: Option<String>) -> Result<Self, ConfigError> {
        let Some(value) = value else {
            return Ok(Self::default());
        };

        let max_file_size = value.trim().parse::<u64>().map_err(|e| {
            ConfigError::Parse(format!("{MAX_FILE_SIZE_ENV}={value:?}: {e}"))
        })?;

        Ok(Self { max_file_size })
    }
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}
