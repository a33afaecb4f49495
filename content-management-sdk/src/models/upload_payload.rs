use std::io::{self, Read};

use thiserror::Error;

use crate::common::config::UploadConfig;
use crate::models::file_content_source::FileContentSource;

/// アップロード用ペイロードの読み取り時に発生するエラー
#[derive(Debug, Error)]
pub enum UploadError {
    /// ストリームを開けない、または読み取りに失敗した
    #[error("Failed to read `{file_name}`: {source}")]
    Io {
        file_name: String,
        #[source]
        source: io::Error,
    },

    /// 内容が `UploadConfig::max_file_size` を超えている
    #[error("File `{file_name}` exceeds the maximum upload size of {limit} bytes")]
    FileTooLarge { file_name: String, limit: u64 },
}

/// アップロードリクエストに添付する本文とメタデータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPayload {
    file_name: String,
    content_type: String,
    body: Vec<u8>,
}

impl UploadPayload {
    /// FileContentSource を最後まで読み取り、アップロード用のペイロードを作る
    ///
    /// - 新しく作られたストリームはこの関数内で解放される
    /// - 外部ストリームは閉じず、読み進めた位置のまま呼び出し側に残る
    /// - `config.max_file_size` を超えた時点で読み取りを止め、`FileTooLarge` を返す
    pub fn read_from(
        source: &FileContentSource,
        config: &UploadConfig,
    ) -> Result<Self, UploadError> {
        let file_name = source.file_name();
        let io_error = |err: io::Error| UploadError::Io {
            file_name: file_name.to_string(),
            source: err,
        };

        let stream = source.open_read_stream().map_err(io_error)?;

        let limit = config.max_file_size;
        let mut body = Vec::new();
        stream
            .take(limit.saturating_add(1))
            .read_to_end(&mut body)
            .map_err(io_error)?;

        if body.len() as u64 > limit {
            tracing::warn!("Rejecting {}: larger than {} bytes", file_name, limit);
            return Err(UploadError::FileTooLarge {
                file_name: file_name.to_string(),
                limit,
            });
        }

        tracing::debug!(
            "Read {} bytes from {} ({})",
            body.len(),
            file_name,
            source.content_type()
        );

        Ok(Self {
            file_name: file_name.to_string(),
            content_type: source.content_type().to_string(),
            body,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content_stream::shared_stream;
    use std::io::Cursor;

    fn config(max_file_size: u64) -> UploadConfig {
        UploadConfig { max_file_size }
    }

    #[test]
    fn test_read_from_buffer() {
        let source =
            FileContentSource::from_bytes(b"payload".to_vec(), "p.txt", "text/plain").unwrap();
        let payload = UploadPayload::read_from(&source, &UploadConfig::default()).unwrap();

        assert_eq!(payload.file_name(), "p.txt");
        assert_eq!(payload.content_type(), "text/plain");
        assert_eq!(payload.body(), b"payload");
        assert_eq!(payload.len(), 7);
        assert!(!payload.is_empty());
    }

    #[test]
    fn test_read_from_buffer_twice() {
        let source =
            FileContentSource::from_bytes(b"again".to_vec(), "a.txt", "text/plain").unwrap();

        let first = UploadPayload::read_from(&source, &UploadConfig::default()).unwrap();
        let second = UploadPayload::read_from(&source, &UploadConfig::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_read_exactly_at_limit() {
        let source =
            FileContentSource::from_bytes(vec![7u8; 16], "b.bin", "application/octet-stream")
                .unwrap();
        let payload = UploadPayload::read_from(&source, &config(16)).unwrap();
        assert_eq!(payload.into_body(), vec![7u8; 16]);
    }

    #[test]
    fn test_read_over_limit() {
        let source =
            FileContentSource::from_bytes(vec![7u8; 17], "b.bin", "application/octet-stream")
                .unwrap();
        let err = UploadPayload::read_from(&source, &config(16)).unwrap_err();

        match err {
            UploadError::FileTooLarge { file_name, limit } => {
                assert_eq!(file_name, "b.bin");
                assert_eq!(limit, 16);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_from_shared_stream_leaves_it_open() {
        let stream = shared_stream(Cursor::new(b"shared body".to_vec()));
        let source =
            FileContentSource::from_stream(stream.clone(), "s.txt", "text/plain").unwrap();

        let payload = UploadPayload::read_from(&source, &UploadConfig::default()).unwrap();
        assert_eq!(payload.body(), b"shared body");

        // The caller still holds a usable handle, now at the end of the data.
        let mut rest = Vec::new();
        stream.lock().unwrap().read_to_end(&mut rest).unwrap();
        assert!(rest.is_empty());
    }

    #[test]
    fn test_read_over_limit_from_shared_stream() {
        let stream = shared_stream(Cursor::new(b"0123456789".to_vec()));
        let source =
            FileContentSource::from_stream(stream.clone(), "s.txt", "text/plain").unwrap();

        let err = UploadPayload::read_from(&source, &config(4)).unwrap_err();
        assert!(matches!(err, UploadError::FileTooLarge { limit: 4, .. }));

        // limit + 1 bytes were consumed; the rest is still available to the caller.
        let mut rest = Vec::new();
        stream.lock().unwrap().read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"56789");
    }

    #[test]
    fn test_read_from_missing_path() {
        let source =
            FileContentSource::from_path("/no/such/dir/missing.txt", "text/plain").unwrap();
        let err = UploadPayload::read_from(&source, &UploadConfig::default()).unwrap_err();

        match err {
            UploadError::Io { file_name, source } => {
                assert_eq!(file_name, "missing.txt");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
