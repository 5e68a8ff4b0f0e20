use std::io::{BufRead, Read, Write};

use quarry_chunk::{Chunk, NODE_COUNT, Node};
use quarry_content::{ContentClassifier, ContentId};

use crate::error::CodecError;
use crate::format::{
    FLAG_DAY_NIGHT_DIFFERS, FLAG_LIGHTING_EXPIRED, FLAG_UNDERGROUND, Layout, layout,
};
use crate::rle::{compress_rle, decompress_rle};
use crate::zlib::{compress_zlib, decompress_zlib};

fn content_byte(content: ContentId) -> Result<u8, CodecError> {
    u8::try_from(content).map_err(|_| CodecError::ContentOutOfRange(content))
}

/// Writes `chunk` in the layout of format `version`.
pub fn serialize_chunk<W: Write>(
    chunk: &Chunk,
    version: u8,
    out: &mut W,
) -> Result<(), CodecError> {
    let layout = layout(version)?;
    let nodes = chunk
        .nodes()
        .ok_or_else(|| CodecError::NotAllocated(chunk.origin()))?;
    let contents = nodes
        .iter()
        .map(|n| content_byte(n.content))
        .collect::<Result<Vec<u8>, _>>()?;

    match layout {
        Layout::Flat { node_width } => {
            let mut buf = Vec::with_capacity(1 + NODE_COUNT * node_width);
            buf.push(chunk.is_underground as u8);
            for (n, &c) in nodes.iter().zip(&contents) {
                buf.push(c);
                if node_width >= 2 {
                    buf.push(n.param.0);
                }
                if node_width >= 3 {
                    buf.push(n.param2);
                }
            }
            out.write_all(&buf)?;
        }
        Layout::Planes { planes } => {
            out.write_all(&[chunk.is_underground as u8])?;
            compress_rle(&contents, out)?;
            let params: Vec<u8> = nodes.iter().map(|n| n.param.0).collect();
            compress_rle(&params, out)?;
            if planes >= 3 {
                let param2: Vec<u8> = nodes.iter().map(|n| n.param2).collect();
                compress_rle(&param2, out)?;
            }
        }
        Layout::Packed => {
            let mut flags = 0;
            if chunk.is_underground {
                flags |= FLAG_UNDERGROUND;
            }
            if chunk.day_night_differs {
                flags |= FLAG_DAY_NIGHT_DIFFERS;
            }
            if chunk.lighting_expired {
                flags |= FLAG_LIGHTING_EXPIRED;
            }
            out.write_all(&[flags])?;
            let mut data = contents;
            data.reserve(NODE_COUNT * 2);
            data.extend(nodes.iter().map(|n| n.param.0));
            data.extend(nodes.iter().map(|n| n.param2));
            compress_zlib(&data, out)?;
        }
    }
    Ok(())
}

fn read_byte<R: Read>(input: &mut R, what: &str) -> Result<u8, CodecError> {
    let mut b = [0u8; 1];
    input
        .read_exact(&mut b)
        .map_err(|e| CodecError::from_read(e, what))?;
    Ok(b[0])
}

/// Reads a chunk written in format `version` into `chunk`.
///
/// The chunk is allocated if needed. Nothing in it changes unless the whole
/// input decodes. Legacy content with a registered replacement is translated
/// once all planes are in.
pub fn deserialize_chunk<R: BufRead>(
    chunk: &mut Chunk,
    version: u8,
    input: &mut R,
    classifier: &dyn ContentClassifier,
) -> Result<(), CodecError> {
    let layout = layout(version)?;
    let mut nodes = vec![Node::AIR; NODE_COUNT];
    let mut flags = (false, chunk.day_night_differs, chunk.lighting_expired);

    match layout {
        Layout::Flat { node_width } => {
            flags.0 = read_byte(input, "underground flag")? != 0;
            let mut buf = vec![0u8; NODE_COUNT * node_width];
            input
                .read_exact(&mut buf)
                .map_err(|e| CodecError::from_read(e, "node data"))?;
            for (n, raw) in nodes.iter_mut().zip(buf.chunks_exact(node_width)) {
                n.content = raw[0] as ContentId;
                if node_width >= 2 {
                    n.param.0 = raw[1];
                }
                if node_width >= 3 {
                    n.param2 = raw[2];
                }
            }
            if version == 1 {
                // light was not stored yet
                for n in nodes.iter_mut() {
                    if classifier.light_propagates(n.content)
                        || classifier.light_source(n.content) > 0
                    {
                        n.param.0 = 0;
                    }
                }
            }
        }
        Layout::Planes { planes } => {
            flags.0 = read_byte(input, "underground flag")? != 0;
            let contents = decompress_rle(input, NODE_COUNT)?;
            let params = decompress_rle(input, NODE_COUNT)?;
            for ((n, &c), &p) in nodes.iter_mut().zip(&contents).zip(&params) {
                n.content = c as ContentId;
                n.param.0 = p;
            }
            if planes >= 3 {
                let param2 = decompress_rle(input, NODE_COUNT)?;
                for (n, &p2) in nodes.iter_mut().zip(&param2) {
                    n.param2 = p2;
                }
            }
        }
        Layout::Packed => {
            let f = read_byte(input, "flags")?;
            flags = (
                f & FLAG_UNDERGROUND != 0,
                f & FLAG_DAY_NIGHT_DIFFERS != 0,
                f & FLAG_LIGHTING_EXPIRED != 0,
            );
            let data = decompress_zlib(input, NODE_COUNT * 3)?;
            let (contents, rest) = data.split_at(NODE_COUNT);
            let (params, param2) = rest.split_at(NODE_COUNT);
            for (i, n) in nodes.iter_mut().enumerate() {
                n.content = contents[i] as ContentId;
                n.param.0 = params[i];
                n.param2 = param2[i];
            }
        }
    }

    let translated = translate_legacy(&mut nodes, classifier);
    if translated > 0 {
        log::warn!(
            "translated {} legacy nodes in chunk {:?} (format version {})",
            translated,
            chunk.pos(),
            version
        );
    }

    if chunk.is_dummy() {
        chunk.allocate();
    }
    let origin = chunk.origin();
    let dst = chunk
        .nodes_mut()
        .ok_or_else(|| CodecError::NotAllocated(origin))?;
    dst.copy_from_slice(&nodes);
    (
        chunk.is_underground,
        chunk.day_night_differs,
        chunk.lighting_expired,
    ) = flags;
    // in memory now matches what was read, apart from translated nodes
    chunk.changed = translated > 0;
    chunk.set_mesh_expired(true);
    Ok(())
}

/// Replaces nodes whose content has a registered legacy replacement.
fn translate_legacy(nodes: &mut [Node], classifier: &dyn ContentClassifier) -> usize {
    let mut count = 0;
    for (i, n) in nodes.iter_mut().enumerate() {
        if let Some(t) = classifier.translate_to(n.content) {
            log::debug!("node {}: legacy content {} -> {}", i, n.content, t.content);
            *n = Node::with_params(t.content, t.param, t.param2);
            count += 1;
        }
    }
    count
}
