//! Specialization logic for the two dictionary kinds (JMdict vs KANJIDIC2).

use std::path::Path;

use serde::Serialize;

use crate::edrdg::config::TranscodeConfig;
use crate::edrdg::format::document::Element;
use crate::edrdg::format::{jmdict, kanjidic};

use super::error::Result;
use super::models::{CharacterEntry, WordEntry};

/// A trait that defines how one source dictionary is transcoded.
pub trait DictionaryKind {
    /// A short name used for debugging and logging.
    const DEBUG_NAME: &'static str;

    /// Tag of the record elements directly under the document root.
    const RECORD_TAG: &'static str;

    /// The transcoded record type.
    /// - `WordEntry` for JMdict.
    /// - `CharacterEntry` for KANJIDIC2.
    type Entry: Serialize + Send;

    /// The configured source document for this kind.
    fn source_path(config: &TranscodeConfig) -> &Path;

    /// Transcodes one record subtree.
    fn transcode(record: &Element) -> Result<Self::Entry>;
}

/// Zero-cost marker struct for the JMdict word dictionary.
#[derive(Debug, Clone, Copy)]
pub struct Jmdict;

impl DictionaryKind for Jmdict {
    const DEBUG_NAME: &'static str = "JMdict";
    const RECORD_TAG: &'static str = "entry";
    type Entry = WordEntry;

    fn source_path(config: &TranscodeConfig) -> &Path {
        &config.jmdict_source
    }

    fn transcode(record: &Element) -> Result<Self::Entry> {
        jmdict::transcode_entry(record)
    }
}

/// Zero-cost marker struct for the KANJIDIC2 character dictionary.
#[derive(Debug, Clone, Copy)]
pub struct Kanjidic2;

impl DictionaryKind for Kanjidic2 {
    const DEBUG_NAME: &'static str = "KANJIDIC2";
    const RECORD_TAG: &'static str = "character";
    type Entry = CharacterEntry;

    fn source_path(config: &TranscodeConfig) -> &Path {
        &config.kanjidic2_source
    }

    fn transcode(record: &Element) -> Result<Self::Entry> {
        kanjidic::transcode_character(record)
    }
}
