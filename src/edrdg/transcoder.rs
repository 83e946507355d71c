use std::marker::PhantomData;
use std::path::Path;

use log::{debug, info, warn};
use rayon::prelude::*;

use super::codec::entities::NeutralizedCopy;
use super::config::{EntityMode, TranscodeConfig};
use super::format::document::{Document, Element};
use super::format::output;
use super::types::error::Result;
use super::types::kinds::DictionaryKind;

/// Outcome of [`DictionaryTranscoder::generate_if_missing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    /// The target already existed and was left untouched.
    Skipped,
    /// The dictionary was transcoded and written.
    Written { entries: usize, bytes: u64 },
}

/// Runs the full pipeline for one dictionary kind.
///
/// ```text
/// source.xml → neutralize (scratch mode) → load → transcode each record
///            → JSON array → gzip → target
/// ```
#[derive(Debug, Clone)]
pub struct DictionaryTranscoder<K: DictionaryKind> {
    config: TranscodeConfig,
    _kind: PhantomData<K>,
}

impl<K: DictionaryKind> DictionaryTranscoder<K> {
    pub fn new(config: TranscodeConfig) -> Self {
        Self {
            config,
            _kind: PhantomData,
        }
    }

    pub fn config(&self) -> &TranscodeConfig {
        &self.config
    }

    /// Loads a source document using the configured entity mode.
    ///
    /// In [`EntityMode::Scratch`] the scratch copy is removed before this
    /// returns, whether or not parsing succeeded.
    pub fn load_document(&self, source: &Path) -> Result<Document> {
        debug!(
            "Loading {} source {} (entity mode: {})",
            K::DEBUG_NAME,
            source.display(),
            self.config.entity_mode
        );
        match self.config.entity_mode {
            EntityMode::Scratch => {
                let copy = NeutralizedCopy::create(source, self.config.scratch_dir.as_deref())?;
                Document::parse_reader(copy.open()?, EntityMode::Scratch)
            }
            mode => Document::parse_file(source, mode),
        }
    }

    /// Transcodes every record of a loaded document, in document order.
    ///
    /// # Errors
    /// The first failing record aborts the run and is reported with its
    /// position among the records.
    pub fn transcode_document(&self, document: &Document) -> Result<Vec<K::Entry>> {
        let records: Vec<&Element> = document.records(K::RECORD_TAG).collect();
        info!(
            "Transcoding {} <{}> records from {}",
            records.len(),
            K::RECORD_TAG,
            K::DEBUG_NAME
        );

        let transcode = |(index, record): (usize, &&Element)| {
            K::transcode(record).map_err(|e| e.in_record(K::RECORD_TAG, index))
        };

        if self.config.parallel {
            // indexed collect keeps document order
            records.par_iter().enumerate().map(transcode).collect()
        } else {
            records.iter().enumerate().map(transcode).collect()
        }
    }

    /// Loads and transcodes `source` without writing anything.
    pub fn transcode_file(&self, source: &Path) -> Result<Vec<K::Entry>> {
        let document = self.load_document(source)?;
        self.transcode_document(&document)
    }

    /// Transcodes `source` and writes the compressed JSON to `target`.
    ///
    /// Returns the entry count and the compressed size in bytes.
    pub fn transcode_to(&self, source: &Path, target: &Path) -> Result<(usize, u64)> {
        let entries = self.transcode_file(source)?;
        let json = output::serialize_entries(&entries, self.config.minify)?;
        let bytes = output::write_compressed(&json, target, self.config.compression_level)?;
        Ok((entries.len(), bytes))
    }

    /// Transcodes the configured source into `target`.
    pub fn run(&self, target: &Path) -> Result<usize> {
        self.config.validate()?;
        let (entries, _) = self.transcode_to(K::source_path(&self.config), target)?;
        Ok(entries)
    }

    /// Runs [`run`](Self::run) only if `target` does not exist yet.
    pub fn generate_if_missing(&self, target: &Path) -> Result<Generation> {
        if target.exists() {
            warn!(
                "{} output {} already exists, skipping",
                K::DEBUG_NAME,
                target.display()
            );
            return Ok(Generation::Skipped);
        }
        self.config.validate()?;
        let (entries, bytes) = self.transcode_to(K::source_path(&self.config), target)?;
        Ok(Generation::Written { entries, bytes })
    }
}

impl<K: DictionaryKind> Default for DictionaryTranscoder<K> {
    fn default() -> Self {
        Self::new(TranscodeConfig::default())
    }
}

