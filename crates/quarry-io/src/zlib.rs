use std::io::{BufRead, Write};

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::error::CodecError;

pub fn compress_zlib<W: Write>(data: &[u8], out: &mut W) -> Result<(), CodecError> {
    let mut encoder = ZlibEncoder::new(out, Compression::default());
    encoder.write_all(data)?;
    encoder.finish()?;
    Ok(())
}

/// Inflates one zlib stream that must expand to exactly `expected` bytes.
///
/// The stream has to end properly, checksum included. Input after it is
/// left unread.
pub fn decompress_zlib<R: BufRead>(input: &mut R, expected: usize) -> Result<Vec<u8>, CodecError> {
    let mut inflater = Decompress::new(true);
    // one spare byte so an oversized block is noticed
    let mut out = Vec::with_capacity(expected + 1);
    loop {
        let buf = input
            .fill_buf()
            .map_err(|e| CodecError::from_read(e, "zlib block"))?;
        let eof = buf.is_empty();
        let flush = if eof {
            FlushDecompress::Finish
        } else {
            FlushDecompress::None
        };
        let in_before = inflater.total_in();
        let status = inflater
            .decompress_vec(buf, &mut out, flush)
            .map_err(|e| CodecError::CorruptData(format!("zlib block: {e}")))?;
        let consumed = (inflater.total_in() - in_before) as usize;
        input.consume(consumed);
        if out.len() > expected {
            return Err(CodecError::CorruptData(format!(
                "zlib block exceeds {expected} bytes"
            )));
        }
        match status {
            Status::StreamEnd => break,
            _ if eof => {
                return Err(CodecError::CorruptData("zlib block is truncated".into()));
            }
            _ => {}
        }
    }
    if out.len() != expected {
        return Err(CodecError::CorruptData(format!(
            "zlib block is {} bytes, expected {expected}",
            out.len()
        )));
    }
    Ok(out)
}
