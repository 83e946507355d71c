//! Custom error types for the edrdg-json crate.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The source document could not be opened. Nothing was written.
    #[error("Cannot open source document {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The XML reader rejected the document.
    #[error("Malformed XML at byte {position}: {message}")]
    MalformedXml { position: u64, message: String },

    /// An entity or character reference could not be resolved.
    #[error("Invalid entity reference: {0}")]
    InvalidReference(String),

    /// The document contained no root element.
    #[error("Document has no root element")]
    EmptyDocument,

    /// A child element that every record carries was absent.
    #[error("Missing required <{element}> in <{parent}>")]
    MissingElement {
        parent: String,
        element: &'static str,
    },

    /// An attribute that every element of this kind carries was absent.
    #[error("Missing required attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    /// A numeric field held something other than an integer.
    #[error("Expected an integer for {field}, found {value:?}")]
    NotAnInteger { field: &'static str, value: String },

    /// A single record failed; the whole dictionary run is aborted.
    #[error("Failed to transcode <{tag}> record #{index}: {source}")]
    Record {
        tag: &'static str,
        index: usize,
        source: Box<TranscodeError>,
    },

    /// Serializing the transcoded entries (or re-reading an output) failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value was out of range or unparseable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TranscodeError {
    /// Attaches the position of the failing record.
    pub fn in_record(self, tag: &'static str, index: usize) -> Self {
        TranscodeError::Record {
            tag,
            index,
            source: Box::new(self),
        }
    }
}

/// A convenience `Result` type alias using the crate's `TranscodeError` type.
pub type Result<T> = std::result::Result<T, TranscodeError>;
