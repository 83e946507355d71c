//! Serialization and output of transcoded dictionaries.
//!
//! The output file is a gzip stream whose content is one UTF-8 JSON array
//! holding every entry in document order.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::edrdg::codec::compression;
use crate::edrdg::types::error::Result;

/// Renders the entries as a JSON array.
///
/// Minified output contains no insignificant whitespace; otherwise objects
/// and arrays are indented by two spaces.
pub fn serialize_entries<E: Serialize>(entries: &[E], minify: bool) -> Result<Vec<u8>> {
    let bytes = if minify {
        serde_json::to_vec(entries)?
    } else {
        serde_json::to_vec_pretty(entries)?
    };
    debug!(
        "Serialized {} entries to {} bytes of JSON (minify={})",
        entries.len(),
        bytes.len(),
        minify
    );
    Ok(bytes)
}

/// Compresses `json` and writes it to `target`.
///
/// The bytes go to a temporary sibling first and are renamed into place, so
/// `target` either receives the complete output or is left untouched. The
/// parent directory must already exist.
pub fn write_compressed(json: &[u8], target: &Path, level: u32) -> Result<u64> {
    let compressed = compression::gzip_compress(json, level)?;

    let parent = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(&compressed)?;
    staged.as_file().sync_all()?;
    staged.persist(target).map_err(|e| e.error)?;

    info!(
        "Wrote {} ({} bytes JSON, {} bytes compressed)",
        target.display(),
        json.len(),
        compressed.len()
    );
    Ok(compressed.len() as u64)
}

/// Reads an output file back: decompresses it and parses the JSON array.
pub fn read_output(path: &Path) -> Result<serde_json::Value> {
    let compressed = fs::read(path)?;
    let json = compression::gzip_decompress(&compressed)?;
    Ok(serde_json::from_slice(&json)?)
}
