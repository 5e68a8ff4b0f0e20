//! Run-length plane coding used by the separate-plane formats.
//!
//! A big-endian `u32` byte count followed by `(count, byte)` pairs, each
//! count in `1..=255`.

use std::io::{Read, Write};

use crate::error::CodecError;

pub fn compress_rle<W: Write>(data: &[u8], out: &mut W) -> Result<(), CodecError> {
    let len = u32::try_from(data.len())
        .map_err(|_| CodecError::CorruptData(format!("plane of {} bytes", data.len())))?;
    out.write_all(&len.to_be_bytes())?;
    let mut i = 0;
    while i < data.len() {
        let b = data[i];
        let mut run = 1;
        while run < u8::MAX as usize && i + run < data.len() && data[i + run] == b {
            run += 1;
        }
        out.write_all(&[run as u8, b])?;
        i += run;
    }
    Ok(())
}

/// Decodes one plane that must be exactly `expected` bytes long.
pub fn decompress_rle<R: Read>(input: &mut R, expected: usize) -> Result<Vec<u8>, CodecError> {
    let mut len = [0u8; 4];
    input
        .read_exact(&mut len)
        .map_err(|e| CodecError::from_read(e, "plane length"))?;
    let len = u32::from_be_bytes(len) as usize;
    if len != expected {
        return Err(CodecError::CorruptData(format!(
            "plane is {len} bytes, expected {expected}"
        )));
    }
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        let mut pair = [0u8; 2];
        input
            .read_exact(&mut pair)
            .map_err(|e| CodecError::from_read(e, "plane run"))?;
        let [count, b] = pair;
        let count = count as usize;
        if count == 0 || out.len() + count > len {
            return Err(CodecError::CorruptData(format!(
                "run of {count} at offset {} overflows plane",
                out.len()
            )));
        }
        out.resize(out.len() + count, b);
    }
    Ok(out)
}
