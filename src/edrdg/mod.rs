//! Core JMdict / KANJIDIC2 transcoding module

pub mod codec;
pub mod config;
pub mod format;
pub mod types;
mod transcoder;
mod utils;

use std::path::Path;

pub use config::{EntityMode, TranscodeConfig};
pub use transcoder::{DictionaryTranscoder, Generation};
pub use types::error::{Result, TranscodeError};
pub use types::kinds::{DictionaryKind, Jmdict, Kanjidic2};

/// Transcodes the configured JMdict source into `target`.
///
/// Source paths and the remaining settings come from
/// [`TranscodeConfig::from_env`]; `minify` overrides the configured value.
/// Returns the number of entries written.
pub fn jmdict_to_json(target: impl AsRef<Path>, minify: bool) -> Result<usize> {
    let config = TranscodeConfig {
        minify,
        ..TranscodeConfig::from_env()?
    };
    DictionaryTranscoder::<Jmdict>::new(config).run(target.as_ref())
}

/// Transcodes the configured KANJIDIC2 source into `target`.
///
/// See [`jmdict_to_json`] for how the configuration is resolved.
pub fn kanjidic2_to_json(target: impl AsRef<Path>, minify: bool) -> Result<usize> {
    let config = TranscodeConfig {
        minify,
        ..TranscodeConfig::from_env()?
    };
    DictionaryTranscoder::<Kanjidic2>::new(config).run(target.as_ref())
}
