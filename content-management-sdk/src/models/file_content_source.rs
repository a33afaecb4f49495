use std::fmt;
use std::fs::File;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::common::error::{ensure_not_empty, FileContentSourceError};
use crate::models::content_stream::{ContentStream, SharedStream};

const EMPTY_FILE_NAME: &str = "File name cannot be empty.";
const EMPTY_FILE_PATH: &str = "File path cannot be empty.";
const EMPTY_CONTENT_TYPE: &str = "Content type cannot be empty.";

/// ファイル内容の取得元
#[derive(Clone)]
pub enum ContentOrigin {
    /// メモリ上のバイト列
    Buffer(Arc<[u8]>),
    /// ファイルシステム上のパス（存在確認は読み取り時に行う）
    Path(PathBuf),
    /// 呼び出し側が所有する、既に開かれたストリーム
    ExternalStream(SharedStream),
}

impl fmt::Debug for ContentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentOrigin::Buffer(data) => f.debug_tuple("Buffer").field(&data.len()).finish(),
            ContentOrigin::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ContentOrigin::ExternalStream(_) => f.write_str("ExternalStream(..)"),
        }
    }
}

/// アセットのアップロードに使うファイル内容
///
/// バイト列・ファイルパス・外部ストリームのいずれか1つだけを保持し、生成後は変更できない。
/// 内容は `open_read_stream` で読み取る。
#[derive(Debug, Clone)]
pub struct FileContentSource {
    origin: ContentOrigin,
    file_name: String,
    content_type: String,
}

impl FileContentSource {
    /// メモリ上のバイト列から生成する
    ///
    /// - `file_name` と `content_type` は空文字不可
    /// - 空のバイト列は許容する
    pub fn from_bytes(
        data: impl Into<Arc<[u8]>>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Result<Self, FileContentSourceError> {
        let file_name = file_name.into();
        let content_type = content_type.into();

        ensure_not_empty("file_name", &file_name, EMPTY_FILE_NAME)?;
        ensure_not_empty("content_type", &content_type, EMPTY_CONTENT_TYPE)?;

        Ok(Self {
            origin: ContentOrigin::Buffer(data.into()),
            file_name,
            content_type,
        })
    }

    /// ファイルパスから生成する
    ///
    /// ファイル名はパスの末尾要素から導出する。ファイルの存在はここでは確認せず、
    /// `open_read_stream` の呼び出し時に初めて開く。
    pub fn from_path(
        file_path: impl AsRef<Path>,
        content_type: impl Into<String>,
    ) -> Result<Self, FileContentSourceError> {
        let file_path = file_path.as_ref();
        let content_type = content_type.into();

        if file_path.as_os_str().is_empty() {
            return Err(FileContentSourceError::invalid_argument(
                "file_path",
                EMPTY_FILE_PATH,
            ));
        }
        ensure_not_empty("content_type", &content_type, EMPTY_CONTENT_TYPE)?;

        let file_name = file_name_of(file_path)?;

        Ok(Self {
            origin: ContentOrigin::Path(file_path.to_path_buf()),
            file_name,
            content_type,
        })
    }

    /// ファイルパスから生成し、Content-Type を拡張子から推測する
    ///
    /// 推測できない場合は `application/octet-stream` になる。
    pub fn from_path_guessed(file_path: impl AsRef<Path>) -> Result<Self, FileContentSourceError> {
        let file_path = file_path.as_ref();
        let content_type = mime_guess::from_path(file_path).first_or_octet_stream();
        Self::from_path(file_path, content_type.essence_str())
    }

    /// 外部ストリームから生成する
    ///
    /// ストリームの所有権は呼び出し側に残り、このオブジェクトが閉じることはない。
    ///
    /// 他の生成方法と異なり `file_name` の空文字は検証しない。既存の呼び出し側が
    /// この緩い挙動に依存している可能性があるため、警告ログを出すだけに留めている。
    pub fn from_stream(
        stream: SharedStream,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Result<Self, FileContentSourceError> {
        let file_name = file_name.into();
        let content_type = content_type.into();

        ensure_not_empty("content_type", &content_type, EMPTY_CONTENT_TYPE)?;

        if file_name.is_empty() {
            tracing::warn!(
                "File content source created from a stream without a file name (content type {})",
                content_type
            );
        }

        Ok(Self {
            origin: ContentOrigin::ExternalStream(stream),
            file_name,
            content_type,
        })
    }

    /// 内容を先頭から読み取るストリームを返す
    ///
    /// - Buffer: 呼び出しごとに新しいインメモリストリームを返す
    /// - Path: 呼び出しごとにファイルを開き直す。開けない場合は `io::Error` をそのまま返す
    /// - ExternalStream: 生成時に渡されたストリームを毎回そのまま返す（巻き戻しはしない）
    pub fn open_read_stream(&self) -> io::Result<ContentStream> {
        match &self.origin {
            ContentOrigin::Buffer(data) => {
                tracing::debug!(
                    "Opening in-memory stream for {} ({} bytes)",
                    self.file_name,
                    data.len()
                );
                Ok(ContentStream::Owned(Box::new(Cursor::new(Arc::clone(data)))))
            }
            ContentOrigin::Path(path) => {
                tracing::debug!("Opening file {} for {}", path.display(), self.file_name);
                let file = File::open(path)?;
                if file.metadata()?.is_dir() {
                    return Err(io::Error::other(format!(
                        "{} is a directory",
                        path.display()
                    )));
                }
                Ok(ContentStream::Owned(Box::new(file)))
            }
            ContentOrigin::ExternalStream(stream) => {
                tracing::debug!("Reusing external stream for {}", self.file_name);
                Ok(ContentStream::Shared(Arc::clone(stream)))
            }
        }
    }

    pub fn origin(&self) -> &ContentOrigin {
        &self.origin
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Content-Type (例: "image/jpeg")
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// `open_read_stream` が新しいストリームを作る（呼び出し側が解放する）場合は true
    pub fn owns_stream(&self) -> bool {
        matches!(self.origin, ContentOrigin::Buffer(_) | ContentOrigin::Path(_))
    }
}

fn file_name_of(file_path: &Path) -> Result<String, FileContentSourceError> {
    // `Path::file_name` ignores a trailing separator, so "assets/" would name "assets".
    if file_path
        .as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator)
    {
        return Err(FileContentSourceError::invalid_argument(
            "file_path",
            format!("Path {} does not end with a file name.", file_path.display()),
        ));
    }

    file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            FileContentSourceError::invalid_argument(
                "file_path",
                format!("Path {} does not end with a file name.", file_path.display()),
            )
        })
}
