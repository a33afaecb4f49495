use std::fmt;
use std::io::{self, Read};
use std::sync::{Arc, Mutex};

/// 呼び出し側が所有する、共有可能な読み取りストリーム
///
/// `FileContentSource::from_stream` に渡したあとも呼び出し側は自分の `Arc` を保持し続けるため、
/// ストリームを閉じる（最後の参照を drop する）責任は呼び出し側にあります。
pub type SharedStream = Arc<Mutex<dyn Read + Send>>;

/// 任意の `Read` を `SharedStream` に包む
pub fn shared_stream<R>(reader: R) -> SharedStream
where
    R: Read + Send + 'static,
{
    Arc::new(Mutex::new(reader))
}

/// `FileContentSource::open_read_stream` が返す読み取りストリーム
pub enum ContentStream {
    /// 呼び出しごとに新しく作られたストリーム。drop すると解放される
    Owned(Box<dyn Read + Send>),
    /// 外部から渡されたストリームへの参照。drop しても元のストリームは閉じない
    Shared(SharedStream),
}

impl ContentStream {
    /// 呼び出し側がこのストリームを所有しているか
    pub fn is_owned(&self) -> bool {
        matches!(self, ContentStream::Owned(_))
    }

    pub fn as_shared(&self) -> Option<&SharedStream> {
        match self {
            ContentStream::Owned(_) => None,
            ContentStream::Shared(stream) => Some(stream),
        }
    }
}

impl Read for ContentStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ContentStream::Owned(reader) => reader.read(buf),
            // The lock is held for a single read call only.
            ContentStream::Shared(stream) => stream
                .lock()
                .map_err(|_| io::Error::other("shared content stream lock is poisoned"))?
                .read(buf),
        }
    }
}

impl fmt::Debug for ContentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentStream::Owned(_) => f.write_str("ContentStream::Owned(..)"),
            ContentStream::Shared(_) => f.write_str("ContentStream::Shared(..)"),
        }
    }
}
