pub mod content_stream;
pub mod file_content_source;
pub mod upload_payload;

pub use content_stream::*;
pub use file_content_source::*;
pub use upload_payload::*;
