//! Codec layer for entity handling and compression.
//!
//! # Submodules
//!
//! - [`entities`][]: Entity declaration neutralizing and reference resolution
//! - [`compression`][]: gzip encoding of the serialized output

pub mod compression;
pub mod entities;
