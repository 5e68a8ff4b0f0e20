//! Versioned binary chunk format.
//!
//! Every version from [`SER_VERSION_LOWEST`] to [`SER_VERSION_HIGHEST`] can be
//! read and written. Content ids are one byte on disk.
#![forbid(unsafe_code)]

mod codec;
mod error;
mod format;
pub mod rle;
pub mod zlib;

pub use codec::{deserialize_chunk, serialize_chunk};
pub use error::CodecError;
pub use format::{Layout, SER_VERSION_HIGHEST, SER_VERSION_LOWEST, layout, ser_version_supported};
