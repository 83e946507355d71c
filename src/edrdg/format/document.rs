//! In-memory XML tree used by the record transcoders.
//!
//! The whole document is materialized once with `quick-xml`; records are then
//! walked by tag name. Entity and character references in text and attribute
//! values are resolved while reading, according to the [`EntityMode`].

use std::fs::File;
use std::io::{BufRead, BufReader, Chain, Cursor, Read};
use std::path::Path;

use log::{debug, info};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::edrdg::codec::entities::{EntityTable, resolve_references};
use crate::edrdg::config::EntityMode;
use crate::edrdg::types::error::{Result, TranscodeError};

/// An attribute as written in the source, with its qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An element with its attributes, direct text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Concatenated direct text and CDATA content, references resolved.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// The `lang` attribute in the XML namespace.
    ///
    /// The `xml` prefix is reserved and always bound to that namespace, so the
    /// prefixed name identifies the attribute without namespace resolution.
    pub fn xml_lang(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.split_once(':') == Some(("xml", "lang")))
            .map(|a| a.value.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// Child elements with the given tag, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of every child with the given tag, in document order.
    pub fn texts(&self, name: &str) -> Vec<String> {
        self.children_named(name).map(|c| c.text.clone()).collect()
    }

    pub fn required_child(&self, name: &'static str) -> Result<&Element> {
        self.child(name).ok_or_else(|| TranscodeError::MissingElement {
            parent: self.name.clone(),
            element: name,
        })
    }

    pub fn required_text(&self, name: &'static str) -> Result<String> {
        Ok(self.required_child(name)?.text.clone())
    }

    pub fn required_attr(&self, name: &'static str) -> Result<&str> {
        self.attr(name).ok_or_else(|| TranscodeError::MissingAttribute {
            element: self.name.clone(),
            attribute: name,
        })
    }

    /// Builders for assembling records by hand.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text.push_str(&text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }
}

/// A parsed source document.
#[derive(Debug)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Record elements directly under the root, in document order.
    pub fn records<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.root.children_named(tag)
    }

    /// Opens and parses a document from disk.
    ///
    /// # Errors
    /// Returns [`TranscodeError::SourceUnavailable`] if the file cannot be opened.
    pub fn parse_file(path: &Path, mode: EntityMode) -> Result<Self> {
        info!("Loading XML document: {}", path.display());
        let file = File::open(path).map_err(|e| TranscodeError::SourceUnavailable {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse_reader(BufReader::new(file), mode)
    }

    pub fn parse_str(xml: &str, mode: EntityMode) -> Result<Self> {
        Self::parse_reader(xml.as_bytes(), mode)
    }

    /// Parses a complete document from a buffered reader.
    pub fn parse_reader<R: BufRead>(source: R, mode: EntityMode) -> Result<Self> {
        let mut reader = Reader::from_reader(strip_subset_comments(source)?);
        let mut buf = Vec::new();
        let mut entities = EntityTable::default();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = match reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(e) => {
                    return Err(TranscodeError::MalformedXml {
                        position: reader.buffer_position() as u64,
                        message: e.to_string(),
                    });
                }
            };
            let position = reader.buffer_position() as u64;

            match event {
                Event::DocType(e) => {
                    entities = EntityTable::from_doctype(utf8(&e, position)?, mode);
                    debug!("DOCTYPE declares {} internal entities", entities.len());
                }
                Event::Start(e) => {
                    stack.push(open_element(&e, &entities, position)?);
                }
                Event::Empty(e) => {
                    let element = open_element(&e, &entities, position)?;
                    attach(&mut stack, &mut root, element, position)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| TranscodeError::MalformedXml {
                        position,
                        message: "closing tag without an open element".to_string(),
                    })?;
                    attach(&mut stack, &mut root, element, position)?;
                }
                Event::Text(e) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = utf8(&e, position)?;
                        current
                            .text
                            .push_str(&resolve_references(raw, &entities)?);
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(utf8(&e, position)?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(TranscodeError::MalformedXml {
                position: reader.buffer_position() as u64,
                message: format!("unclosed element <{}>", open.name),
            });
        }
        let root = root.ok_or(TranscodeError::EmptyDocument)?;
        debug!(
            "Document loaded: root <{}> with {} children",
            root.name,
            root.children.len()
        );

        Ok(Self { root })
    }
}

fn open_element(start: &BytesStart, entities: &EntityTable, position: u64) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| TranscodeError::MalformedXml {
            position,
            message: format!("bad attribute on <{}>: {}", element.name, e),
        })?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = resolve_references(utf8(&attr.value, position)?, entities)?.into_owned();
        element.attributes.push(Attribute { name, value });
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    position: u64,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => {
            return Err(TranscodeError::MalformedXml {
                position,
                message: format!("second root element <{}>", element.name),
            });
        }
        None => *root = Some(element),
    }
    Ok(())
}

fn utf8(bytes: &[u8], position: u64) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| TranscodeError::MalformedXml {
        position,
        message: format!("invalid UTF-8: {}", e),
    })
}

/// Position inside a `<!DOCTYPE ...>` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DoctypeScan {
    Header,
    Subset,
    Comment,
    Quoted(u8),
    Trailer,
    Closed,
}

impl DoctypeScan {
    /// Copies `line` to `out`, leaving out comments in the internal subset.
    fn feed(&mut self, line: &[u8], out: &mut Vec<u8>) {
        let mut i = 0;
        while i < line.len() {
            let rest = &line[i..];
            let byte = rest[0];
            match *self {
                DoctypeScan::Header => {
                    match byte {
                        b'[' => *self = DoctypeScan::Subset,
                        b'>' => *self = DoctypeScan::Closed,
                        _ => {}
                    }
                    out.push(byte);
                }
                DoctypeScan::Subset => {
                    if rest.starts_with(b"<!--") {
                        *self = DoctypeScan::Comment;
                        i += 4;
                        continue;
                    }
                    match byte {
                        b'"' | b'\'' => *self = DoctypeScan::Quoted(byte),
                        b']' => *self = DoctypeScan::Trailer,
                        _ => {}
                    }
                    out.push(byte);
                }
                DoctypeScan::Comment => {
                    if rest.starts_with(b"-->") {
                        *self = DoctypeScan::Subset;
                        i += 3;
                        continue;
                    }
                    // keep line numbering
                    if byte == b'\n' {
                        out.push(byte);
                    }
                }
                DoctypeScan::Quoted(quote) => {
                    if byte == quote {
                        *self = DoctypeScan::Subset;
                    }
                    out.push(byte);
                }
                DoctypeScan::Trailer => {
                    if byte == b'>' {
                        *self = DoctypeScan::Closed;
                    }
                    out.push(byte);
                }
                DoctypeScan::Closed => {
                    out.extend_from_slice(rest);
                    return;
                }
            }
            i += 1;
        }
    }
}

/// Drops comments from the DOCTYPE internal subset.
///
/// quick-xml balances `<` and `>` while reading a DOCTYPE, so a comment
/// holding a lone `>` would end the declaration early. Only the prolog is
/// buffered; the rest of the document is read through untouched.
fn strip_subset_comments<R: BufRead>(mut source: R) -> Result<Chain<Cursor<Vec<u8>>, R>> {
    let mut head = Vec::new();
    let mut line = Vec::new();
    let mut scan: Option<DoctypeScan> = None;

    while source.read_until(b'\n', &mut line)? != 0 {
        match scan.as_mut() {
            Some(state) => state.feed(&line, &mut head),
            None => match find(&line, b"<!DOCTYPE") {
                Some(start) => {
                    let header_end = start + b"<!DOCTYPE".len();
                    head.extend_from_slice(&line[..header_end]);
                    let mut state = DoctypeScan::Header;
                    state.feed(&line[header_end..], &mut head);
                    scan = Some(state);
                }
                None => {
                    head.extend_from_slice(&line);
                    if opens_element(&line) {
                        break;
                    }
                }
            },
        }
        line.clear();
        if scan == Some(DoctypeScan::Closed) {
            break;
        }
    }

    Ok(Cursor::new(head).chain(source))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Whether the line holds an element start tag, i.e. the prolog is over.
fn opens_element(line: &[u8]) -> bool {
    line.windows(2).any(|pair| {
        pair[0] == b'<' && (pair[1].is_ascii_alphabetic() || pair[1] == b'_' || pair[1] >= 0x80)
    })
}
