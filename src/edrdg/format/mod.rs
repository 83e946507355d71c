//! Document format layer: XML loading, record transcoding and JSON output.
//!
//! # Module Organization
//!
//! - [`document`]: Loads a source document into an element tree
//! - [`jmdict`]: Transcodes JMdict `<entry>` records
//! - [`kanjidic`]: Transcodes KANJIDIC2 `<character>` records
//! - [`output`]: Serializes, compresses and writes the result
//!
//! # Pipeline
//!
//! ```text
//! source.xml ──► document::Document ──► jmdict / kanjidic ──► output
//!  (entities     (element tree,         (one record at a      (JSON array,
//!   resolved)     document order)        time, in order)       gzip, file)
//! ```

pub mod document;
pub mod jmdict;
pub mod kanjidic;
pub mod output;
