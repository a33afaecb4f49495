use thiserror::Error;

/// FileContentSource の生成時に発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileContentSourceError {
    /// 必須の引数が空 (400 相当、入力を直せば再試行できる)
    #[error("Invalid argument `{name}`: {message}")]
    InvalidArgument { name: &'static str, message: String },
}

impl FileContentSourceError {
    pub(crate) fn invalid_argument(name: &'static str, message: impl Into<String>) -> Self {
        FileContentSourceError::InvalidArgument {
            name,
            message: message.into(),
        }
    }

    /// エラーの原因となった引数名
    pub fn argument_name(&self) -> &'static str {
        match self {
            FileContentSourceError::InvalidArgument { name, .. } => name,
        }
    }
}

/// 空文字であれば `InvalidArgument` を返す
pub(crate) fn ensure_not_empty(
    name: &'static str,
    value: &str,
    message: &str,
) -> Result<(), FileContentSourceError> {
    if value.is_empty() {
        return Err(FileContentSourceError::invalid_argument(name, message));
    }
    Ok(())
}
