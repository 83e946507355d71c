//! Entity declaration neutralizing and reference resolution.
//!
//! JMdict declares a few hundred internal entities (`<!ENTITY n "noun (common)
//! (futsuumeishi)">`) and uses them as coded values (`<pos>&n;</pos>`). The
//! output only needs the entity name, so declarations are rewritten to expand
//! to their own name before the document is loaded.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::OnceLock;

use log::{debug, trace};
use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use regex::Regex;
use tempfile::NamedTempFile;

use crate::edrdg::config::EntityMode;
use crate::edrdg::types::error::{Result, TranscodeError};

static DECLARATION_PATTERN: OnceLock<Regex> = OnceLock::new();
static DECLARED_VALUE_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Matches a complete internal entity declaration with a non-empty value.
fn declaration_regex() -> &'static Regex {
    DECLARATION_PATTERN.get_or_init(|| {
        Regex::new(r#"<!ENTITY\s+(\S+)\s+"[^"]+"\s*>"#)
            .expect("Invalid entity declaration pattern")
    })
}

/// Same grammar as [`declaration_regex`], capturing the value as well.
fn declared_value_regex() -> &'static Regex {
    DECLARED_VALUE_PATTERN.get_or_init(|| {
        Regex::new(r#"<!ENTITY\s+(\S+)\s+"([^"]*)"\s*>"#)
            .expect("Invalid entity value pattern")
    })
}

/// Rewrites every `<!ENTITY name "text">` on the line to `<!ENTITY name "name">`.
///
/// Lines without declarations are returned borrowed and byte-identical.
pub fn neutralize_line(line: &str) -> Cow<'_, str> {
    declaration_regex().replace_all(line, r#"<!ENTITY ${1} "${1}">"#)
}

/// A neutralized scratch copy of a source document.
///
/// The copy lives in a temporary file that is removed when this value is
/// dropped, whether parsing succeeded, failed, or unwound.
#[derive(Debug)]
pub struct NeutralizedCopy {
    file: NamedTempFile,
    rewritten: usize,
}

impl NeutralizedCopy {
    /// Writes the neutralized copy of `source` into `scratch_dir` (or the
    /// system temp dir).
    ///
    /// # Errors
    /// Returns [`TranscodeError::SourceUnavailable`] if `source` cannot be
    /// opened; no scratch file is created in that case.
    pub fn create(source: &Path, scratch_dir: Option<&Path>) -> Result<Self> {
        let input = File::open(source).map_err(|e| TranscodeError::SourceUnavailable {
            path: source.to_path_buf(),
            source: e,
        })?;

        let mut file = match scratch_dir {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };
        trace!("Scratch copy of {} at {}", source.display(), file.path().display());

        let mut rewritten = 0;
        {
            let mut reader = BufReader::new(input);
            let mut writer = BufWriter::new(file.as_file_mut());
            let mut line = String::new();
            // read_line keeps the terminator, so untouched lines stay byte-identical
            while reader.read_line(&mut line)? != 0 {
                rewritten += declaration_regex().find_iter(&line).count();
                writer.write_all(neutralize_line(&line).as_bytes())?;
                line.clear();
            }
            writer.flush()?;
        }

        debug!(
            "Neutralized {} entity declarations in {}",
            rewritten,
            source.display()
        );

        Ok(Self { file, rewritten })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of declarations that were rewritten.
    pub fn rewritten(&self) -> usize {
        self.rewritten
    }

    /// Opens an independent read handle on the scratch copy.
    pub fn open(&self) -> Result<BufReader<File>> {
        Ok(BufReader::new(self.file.reopen()?))
    }
}

impl Drop for NeutralizedCopy {
    fn drop(&mut self) {
        trace!("Removing scratch copy {}", self.file.path().display());
    }
}

/// Internal entities declared in a document's DOCTYPE, mapped to the text a
/// reference to them resolves to.
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    declared: HashMap<String, String>,
}

impl EntityTable {
    /// Collects the declarations found in a DOCTYPE internal subset.
    ///
    /// The first declaration of a name wins, as in XML. In
    /// [`EntityMode::Opaque`] every declared entity resolves to its own name;
    /// otherwise it resolves to its declared text (which a neutralized copy has
    /// already replaced by the name).
    pub fn from_doctype(internal_subset: &str, mode: EntityMode) -> Self {
        let mut declared = HashMap::new();
        for caps in declared_value_regex().captures_iter(internal_subset) {
            let text = match mode {
                EntityMode::Opaque => &caps[1],
                EntityMode::Scratch | EntityMode::Expand => &caps[2],
            };
            declared
                .entry(caps[1].to_string())
                .or_insert_with(|| text.to_string());
        }
        Self { declared }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.declared.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        match resolve_predefined_entity(name) {
            Some(text) => Some(text),
            None => self.get(name),
        }
    }
}

/// Unescapes raw text or attribute content.
///
/// Predefined entities and character references are handled by quick-xml;
/// every other reference must be declared in `table`.
///
/// # Errors
/// Undeclared entities, unterminated references and character references
/// XML does not allow are reported as [`TranscodeError::InvalidReference`].
pub fn resolve_references<'a>(raw: &'a str, table: &EntityTable) -> Result<Cow<'a, str>> {
    unescape_with(raw, |name: &str| table.lookup(name))
        .map_err(|e| TranscodeError::InvalidReference(e.to_string()))
}
