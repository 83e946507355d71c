//! Runtime configuration with environment overrides.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::types::error::{Result, TranscodeError};

/// How entity references in the source documents are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityMode {
    /// Rewrite every declaration to expand to its own name in a scratch copy,
    /// then parse the copy.
    #[default]
    Scratch,
    /// Parse the source directly and resolve every entity to its own name.
    Opaque,
    /// Parse the source directly and expand declared entities to their text.
    Expand,
}

impl FromStr for EntityMode {
    type Err = TranscodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scratch" => Ok(Self::Scratch),
            "opaque" => Ok(Self::Opaque),
            "expand" => Ok(Self::Expand),
            other => Err(TranscodeError::Config(format!(
                "unknown entity mode '{}' (expected scratch, opaque or expand)",
                other
            ))),
        }
    }
}

impl fmt::Display for EntityMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntityMode::Scratch => write!(f, "scratch"),
            EntityMode::Opaque => write!(f, "opaque"),
            EntityMode::Expand => write!(f, "expand"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeConfig {
    pub jmdict_source: PathBuf,
    pub kanjidic2_source: PathBuf,
    /// Emit compact JSON instead of 2-space indented JSON.
    pub minify: bool,
    pub entity_mode: EntityMode,
    /// Transcode records on the rayon pool. Output order is unaffected.
    pub parallel: bool,
    /// gzip level, 0..=9.
    pub compression_level: u32,
    /// Where scratch copies are written. `None` uses the system temp dir.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            jmdict_source: PathBuf::from("./raw/JMdict.xml"),
            kanjidic2_source: PathBuf::from("./raw/kanjidic2.xml"),
            minify: true,
            entity_mode: EntityMode::Scratch,
            parallel: true,
            compression_level: 6,
            scratch_dir: None,
        }
    }
}

impl TranscodeConfig {
    /// Defaults overridden by `EDRDG_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = env::var("EDRDG_JMDICT_XML") {
            config.jmdict_source = PathBuf::from(path);
        }
        if let Ok(path) = env::var("EDRDG_KANJIDIC2_XML") {
            config.kanjidic2_source = PathBuf::from(path);
        }
        if let Ok(value) = env::var("EDRDG_MINIFY") {
            config.minify = parse_flag("EDRDG_MINIFY", &value)?;
        }
        if let Ok(value) = env::var("EDRDG_ENTITY_MODE") {
            config.entity_mode = value.parse()?;
        }
        if let Ok(value) = env::var("EDRDG_PARALLEL") {
            config.parallel = parse_flag("EDRDG_PARALLEL", &value)?;
        }
        if let Ok(value) = env::var("EDRDG_GZIP_LEVEL") {
            config.compression_level = value.trim().parse().map_err(|_| {
                TranscodeError::Config(format!(
                    "EDRDG_GZIP_LEVEL must be a number, got '{}'",
                    value
                ))
            })?;
        }
        if let Ok(dir) = env::var("EDRDG_SCRATCH_DIR") {
            config.scratch_dir = Some(PathBuf::from(dir));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.compression_level > 9 {
            return Err(TranscodeError::Config(format!(
                "compression level must be within 0..=9, got {}",
                self.compression_level
            )));
        }
        Ok(())
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(TranscodeError::Config(format!(
            "{} must be a boolean, got '{}'",
            name, value
        ))),
    }
}
