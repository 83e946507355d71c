//! # edrdg-json
//!
//! Transcodes the EDRDG JMdict (words) and KANJIDIC2 (characters) XML
//! releases into gzip-compressed JSON arrays for a lookup application.
//!
//! Each dictionary has its own pipeline, driven by a
//! [`DictionaryTranscoder`] specialized with [`Jmdict`] or [`Kanjidic2`].
pub mod edrdg;

// Re-export the main types for convenience
pub use edrdg::{
    DictionaryKind,
    DictionaryTranscoder,
    EntityMode,
    Generation,
    Jmdict,
    Kanjidic2,
    Result,
    TranscodeConfig,
    TranscodeError,
    jmdict_to_json,
    kanjidic2_to_json,
    types::models::{
        CharacterEntry,
        ReadingMeaningItem,
        SourceCoverage,
        WordEntry,
    },
};
