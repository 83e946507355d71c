//! gzip compression for serialized dictionary output.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::trace;

use crate::edrdg::types::error::Result;

/// Compresses `payload` into a gzip member at the given level (0..=9).
pub fn gzip_compress(payload: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(
        Vec::with_capacity(payload.len() / 4),
        Compression::new(level),
    );
    encoder.write_all(payload)?;
    let compressed = encoder.finish()?;
    trace!(
        "Compressed with gzip level {}: {} bytes -> {} bytes",
        level,
        payload.len(),
        compressed.len()
    );
    Ok(compressed)
}

/// Inflates a gzip stream produced by [`gzip_compress`].
pub fn gzip_decompress(payload: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(payload.len() * 4);
    GzDecoder::new(payload).read_to_end(&mut output)?;
    trace!(
        "Decompressed gzip: {} bytes -> {} bytes",
        payload.len(),
        output.len()
    );
    Ok(output)
}
