use std::io;

use quarry_content::ContentId;
use quarry_geom::V3i;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("chunk format version {0} is not supported")]
    UnsupportedVersion(u8),
    #[error("corrupt chunk data: {0}")]
    CorruptData(String),
    #[error("chunk {0:?} has no node data to write")]
    NotAllocated(V3i),
    #[error("content id {0} does not fit in one byte")]
    ContentOutOfRange(ContentId),
    #[error("chunk stream: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    /// Short reads and undecodable bytes mean the data is bad, not the stream.
    pub(crate) fn from_read(e: io::Error, what: &str) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::InvalidData
            | io::ErrorKind::InvalidInput => CodecError::CorruptData(format!("{what}: {e}")),
            _ => CodecError::Io(e),
        }
    }
}
