//! Which byte layout each format version uses.

use crate::error::CodecError;

pub const SER_VERSION_LOWEST: u8 = 0;
pub const SER_VERSION_HIGHEST: u8 = 12;

/// Byte layout of a serialized chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Underground byte, then every node at a fixed width, uncompressed.
    Flat { node_width: usize },
    /// Underground byte, then each node field as its own run-length coded plane.
    Planes { planes: usize },
    /// Flags byte, then content, param and param2 planes in one zlib stream.
    Packed,
}

/// Oldest to newest; each entry covers `lo..=hi`.
const LAYOUTS: [(u8, u8, Layout); 7] = [
    (0, 0, Layout::Flat { node_width: 1 }),
    (1, 3, Layout::Flat { node_width: 2 }),
    (4, 4, Layout::Planes { planes: 2 }),
    (5, 6, Layout::Flat { node_width: 2 }),
    (7, 9, Layout::Planes { planes: 2 }),
    (10, 10, Layout::Planes { planes: 3 }),
    (11, SER_VERSION_HIGHEST, Layout::Packed),
];

pub fn ser_version_supported(version: u8) -> bool {
    (SER_VERSION_LOWEST..=SER_VERSION_HIGHEST).contains(&version)
}

pub fn layout(version: u8) -> Result<Layout, CodecError> {
    LAYOUTS
        .iter()
        .find(|(lo, hi, _)| (*lo..=*hi).contains(&version))
        .map(|(_, _, l)| *l)
        .ok_or(CodecError::UnsupportedVersion(version))
}

// Packed flags byte
pub(crate) const FLAG_UNDERGROUND: u8 = 0x01;
pub(crate) const FLAG_DAY_NIGHT_DIFFERS: u8 = 0x02;
pub(crate) const FLAG_LIGHTING_EXPIRED: u8 = 0x04;
