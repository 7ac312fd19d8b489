//! core::document
//!
//! Format-preserving YAML documents.
//!
//! # Design
//!
//! Reconcilers only need four operations on a configuration file: read a
//! nested string, replace it, read a top-level list, replace it. The
//! [`ConfigDocument`] trait exposes exactly those, plus [`render`] to get
//! the text back.
//!
//! [`YamlDocument`] keeps the original source text next to the parsed value.
//! Reads go through the parsed value (so YAML semantics are honored). Writes
//! splice only the affected lines into the source text, leaving comments,
//! quoting, key order and long lines of the rest of the file byte-identical.
//! The spliced text is re-parsed and must equal the old value with only the
//! target changed. Shapes that cannot be edited in place (flow mappings,
//! anchors, block scalars, multi-line values) are refused with
//! [`DocumentError::NotEditable`] and the document is left untouched.
//!
//! # Example
//!
//! ```
//! use stackwatch::core::document::{ConfigDocument, YamlDocument};
//!
//! let mut doc = YamlDocument::parse("meta:\n  stack: 'osx-xcode-13.2.x' # bot\n").unwrap();
//! doc.set_str(&["meta", "stack"], "osx-xcode-14.1.x").unwrap();
//! assert_eq!(doc.render(), "meta:\n  stack: 'osx-xcode-14.1.x' # bot\n");
//! ```
//!
//! [`render`]: ConfigDocument::render

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml_ng::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::persist;

/// Errors from document operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Parse(String),

    #[error("key not found: {0}")]
    KeyMissing(String),

    #[error("value at '{key}' is not {expected}")]
    WrongType { key: String, expected: &'static str },

    #[error("'{0}' cannot be edited in place without reformatting the file")]
    NotEditable(String),

    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Narrow mutable view of a configuration document.
pub trait ConfigDocument {
    /// Read the string at a nested mapping path.
    fn get_str(&self, path: &[&str]) -> Result<String, DocumentError>;

    /// Replace the string at a nested mapping path. The path must exist.
    fn set_str(&mut self, path: &[&str], value: &str) -> Result<(), DocumentError>;

    /// Read the list of strings under a top-level key. A null value reads
    /// as an empty list.
    fn get_list(&self, key: &str) -> Result<Vec<String>, DocumentError>;

    /// Replace the list under a top-level key. The key must exist.
    fn set_list(
        &mut self,
        key: &str,
        items: &[String],
        layout: ListLayout,
    ) -> Result<(), DocumentError>;

    /// Serialize the document back to text.
    fn render(&self) -> String;
}

/// Indentation used when a block sequence is written out.
///
/// Columns are relative to the indentation of the owning key: the dash goes
/// at `offset`, the item text at `sequence` (pushed right if the dash would
/// collide with it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLayout {
    pub sequence: usize,
    pub offset: usize,
}

impl Default for ListLayout {
    fn default() -> Self {
        Self {
            sequence: 4,
            offset: 6,
        }
    }
}

impl ListLayout {
    fn render_item(&self, base_indent: usize, item: &str) -> String {
        let dash = base_indent + self.offset;
        let content = base_indent + self.sequence.max(self.offset + 2);
        format!(
            "{}-{}{}",
            " ".repeat(dash),
            " ".repeat(content - dash - 1),
            render_scalar(item, Quote::Plain)
        )
    }
}

/// A YAML document that edits its source text in place.
#[derive(Debug, Clone)]
pub struct YamlDocument {
    text: String,
    value: Value,
}

impl YamlDocument {
    /// Parse a document from text.
    pub fn parse(text: impl Into<String>) -> Result<Self, DocumentError> {
        let text = text.into();
        let value = parse_value(&text)?;
        Ok(Self { text, value })
    }

    /// Load a document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        if !path.exists() {
            return Err(DocumentError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = text.len(), "loaded document");
        Self::parse(text)
    }

    /// Write the document to disk atomically.
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        persist::write_atomic(path, &self.text).map_err(|source| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "saved document");
        Ok(())
    }

    fn lines(&self) -> Vec<&str> {
        self.text.split_inclusive('\n').collect()
    }

    fn newline(&self) -> &'static str {
        if self.text.contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    /// Accept `text` only if it parses to exactly `expected`.
    fn commit(
        &mut self,
        key: String,
        text: Option<String>,
        expected: Value,
    ) -> Result<(), DocumentError> {
        if let Some(text) = text {
            if let Ok(reparsed) = parse_value(&text) {
                if reparsed == expected {
                    self.text = text;
                    self.value = reparsed;
                    return Ok(());
                }
            }
        }

        warn!(key = %key, "value cannot be edited in place, leaving the document untouched");
        Err(DocumentError::NotEditable(key))
    }

    fn splice_scalar(&self, path: &[&str], current: &str, value: &str) -> Option<String> {
        let lines = self.lines();
        let index = locate(&lines, path)?;
        let line = lines[index];
        let (_, value_start) = split_key(line)?;
        let (start, end, quote) = scalar_span(line, value_start)?;
        if quote == Quote::Plain && &line[start..end] != current {
            return None;
        }

        let mut edited = String::with_capacity(line.len() + value.len());
        edited.push_str(&line[..start]);
        edited.push_str(&render_scalar(value, quote));
        edited.push_str(&line[end..]);

        Some(join_replacing(&lines, index, index + 1, &edited))
    }

    fn splice_list(
        &self,
        key: &str,
        current: &[String],
        items: &[String],
        layout: ListLayout,
    ) -> Option<String> {
        let lines = self.lines();
        let index = locate(&lines, &[key])?;
        let line = lines[index];
        let (_, value_start) = split_key(line)?;
        let indent = indent_of(line);
        let newline = self.newline();

        let rest = line[value_start..].trim_end_matches(['\r', '\n']);
        let (inline, comment) = match comment_start(rest) {
            Some(at) => {
                let inline = rest[..at].trim_end();
                (inline.trim_start(), &rest[inline.len()..])
            }
            None => (rest.trim(), ""),
        };
        let (end, notes) = if inline.is_empty() {
            let end = block_end(&lines, index, lines.len());
            (end, item_notes(&lines[index + 1..end], current)?)
        } else if inline.starts_with('[') && inline.ends_with(']') {
            (index + 1, Vec::new())
        } else {
            return None;
        };

        let mut block = line[..value_start].to_string();
        if items.is_empty() {
            block.push_str(" []");
        }
        block.push_str(comment);
        block.push_str(newline);
        // Comments above a removed item move down to the next kept one.
        let mut carried: Vec<&str> = Vec::new();
        let mut kept = Vec::new();
        for (name, comments) in notes {
            carried.extend(comments);
            if items.contains(&name) {
                kept.push((name, std::mem::take(&mut carried)));
            }
        }

        for item in items {
            if let Some(at) = kept.iter().position(|(name, _)| name == item) {
                block.extend(kept.remove(at).1);
            }
            block.push_str(&layout.render_item(indent, item));
            block.push_str(newline);
        }
        block.extend(carried);

        Some(join_replacing(&lines, index, end, &block))
    }
}

impl ConfigDocument for YamlDocument {
    fn get_str(&self, path: &[&str]) -> Result<String, DocumentError> {
        lookup(&self.value, path)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DocumentError::WrongType {
                key: path.join("."),
                expected: "a string",
            })
    }

    fn set_str(&mut self, path: &[&str], value: &str) -> Result<(), DocumentError> {
        let current = self.get_str(path)?;
        if current == value {
            return Ok(());
        }

        let mut expected = self.value.clone();
        *lookup_mut(&mut expected, path)? = Value::String(value.to_string());
        let text = self.splice_scalar(path, &current, value);
        self.commit(path.join("."), text, expected)
    }

    fn get_list(&self, key: &str) -> Result<Vec<String>, DocumentError> {
        list_of(&self.value, key)
    }

    fn set_list(
        &mut self,
        key: &str,
        items: &[String],
        layout: ListLayout,
    ) -> Result<(), DocumentError> {
        let current = self.get_list(key)?;

        let mut expected = self.value.clone();
        *lookup_mut(&mut expected, &[key])? = Value::Sequence(
            items
                .iter()
                .map(|item| Value::String(item.clone()))
                .collect(),
        );
        let text = self.splice_list(key, &current, items, layout);
        self.commit(key.to_string(), text, expected)
    }

    fn render(&self) -> String {
        self.text.clone()
    }
}

fn parse_value(text: &str) -> Result<Value, DocumentError> {
    serde_yaml_ng::from_str(text).map_err(|e| DocumentError::Parse(e.to_string()))
}

fn lookup<'a>(root: &'a Value, path: &[&str]) -> Result<&'a Value, DocumentError> {
    let mut node = root;
    for (depth, key) in path.iter().enumerate() {
        node = node
            .get(*key)
            .ok_or_else(|| DocumentError::KeyMissing(path[..=depth].join(".")))?;
    }
    Ok(node)
}

fn lookup_mut<'a>(root: &'a mut Value, path: &[&str]) -> Result<&'a mut Value, DocumentError> {
    let mut node = root;
    for (depth, key) in path.iter().enumerate() {
        node = node
            .get_mut(*key)
            .ok_or_else(|| DocumentError::KeyMissing(path[..=depth].join(".")))?;
    }
    Ok(node)
}

fn list_of(root: &Value, key: &str) -> Result<Vec<String>, DocumentError> {
    let wrong_type = || DocumentError::WrongType {
        key: key.to_string(),
        expected: "a list of strings",
    };

    match lookup(root, &[key])? {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(wrong_type))
            .collect(),
        _ => Err(wrong_type()),
    }
}

// =============================================================================
// Line scanning
// =============================================================================

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Blank lines, comments and document markers.
fn is_insignificant(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || (indent_of(line) == 0 && (trimmed == "---" || trimmed == "..."))
}

fn is_sequence_item(line: &str) -> bool {
    let body = line.trim();
    body == "-" || body.starts_with("- ")
}

/// Split a mapping line into its key and the byte offset just past the colon.
fn split_key(line: &str) -> Option<(String, usize)> {
    let indent = indent_of(line);
    let body = &line[indent..];
    if is_sequence_item(body) {
        return None;
    }

    let (key, colon) = match body.chars().next()? {
        quote @ ('"' | '\'') => {
            let close = body[1..].find(quote)? + 1;
            if !body[close + 1..].starts_with(':') {
                return None;
            }
            (body[1..close].to_string(), close + 1)
        }
        _ => {
            let colon = mapping_colon(body)?;
            (body[..colon].trim_end().to_string(), colon)
        }
    };

    Some((key, indent + colon + 1))
}

fn mapping_colon(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    for (i, byte) in bytes.iter().enumerate() {
        match byte {
            b'#' if i > 0 && matches!(bytes[i - 1], b' ' | b'\t') => return None,
            b':' => match bytes.get(i + 1) {
                None | Some(b' ' | b'\t' | b'\r' | b'\n') => return Some(i),
                _ => {}
            },
            _ => {}
        }
    }
    None
}

/// Find `key` among the direct children of the block spanning `start..end`.
fn find_key(lines: &[&str], start: usize, end: usize, key: &str) -> Option<usize> {
    let child_indent = lines[start..end]
        .iter()
        .find(|line| !is_insignificant(line))
        .map(|line| indent_of(line))?;

    for (offset, line) in lines[start..end].iter().enumerate() {
        if is_insignificant(line) {
            continue;
        }
        let indent = indent_of(line);
        if indent < child_indent {
            return None;
        }
        if indent == child_indent {
            if let Some((found, _)) = split_key(line) {
                if found == key {
                    return Some(start + offset);
                }
            }
        }
    }
    None
}

/// One past the last significant line belonging to the key at `key_line`.
///
/// Trailing blank lines and comments stay outside the block.
fn block_end(lines: &[&str], key_line: usize, end: usize) -> usize {
    let indent = indent_of(lines[key_line]);
    let mut last = key_line;
    for (offset, line) in lines[key_line + 1..end].iter().enumerate() {
        if is_insignificant(line) {
            continue;
        }
        let line_indent = indent_of(line);
        if line_indent > indent || (line_indent == indent && is_sequence_item(line)) {
            last = key_line + 1 + offset;
        } else {
            break;
        }
    }
    last + 1
}

/// Group the lines of a block sequence by item.
///
/// Each stored item gets the blank and comment lines just above it. Returns
/// `None` unless every item sits on its own line and matches `current`.
fn item_notes<'a>(
    block: &[&'a str],
    current: &[String],
) -> Option<Vec<(String, Vec<&'a str>)>> {
    let mut notes = Vec::with_capacity(current.len());
    let mut pending = Vec::new();
    for line in block {
        if is_insignificant(line) {
            pending.push(*line);
        } else if is_sequence_item(line) && notes.len() < current.len() {
            notes.push((current[notes.len()].clone(), std::mem::take(&mut pending)));
        } else {
            return None;
        }
    }
    if notes.len() != current.len() || !pending.is_empty() {
        return None;
    }
    Some(notes)
}

/// Line index of the key at the end of `path`.
fn locate(lines: &[&str], path: &[&str]) -> Option<usize> {
    let (mut start, mut end) = (0, lines.len());
    let mut found = None;
    for key in path {
        if start >= end {
            return None;
        }
        let index = find_key(lines, start, end, key)?;
        start = index + 1;
        end = block_end(lines, index, end);
        found = Some(index);
    }
    found
}

fn join_replacing(lines: &[&str], from: usize, to: usize, replacement: &str) -> String {
    let mut out = String::new();
    for line in &lines[..from] {
        out.push_str(line);
    }
    out.push_str(replacement);
    for line in &lines[to..] {
        out.push_str(line);
    }
    out
}

// =============================================================================
// Scalars
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Plain,
    Single,
    Double,
}

/// Byte span and quote style of the single-line scalar after a key.
fn scalar_span(line: &str, value_start: usize) -> Option<(usize, usize, Quote)> {
    let rest = &line[value_start..];
    let start = value_start + (rest.len() - rest.trim_start_matches([' ', '\t']).len());
    let body = &line[start..];
    let bytes = body.as_bytes();

    match bytes.first()? {
        b'\'' => {
            let mut i = 1;
            while i < bytes.len() {
                if bytes[i] == b'\'' {
                    if bytes.get(i + 1) == Some(&b'\'') {
                        i += 2;
                        continue;
                    }
                    return Some((start, start + i + 1, Quote::Single));
                }
                i += 1;
            }
            None
        }
        b'"' => {
            let mut i = 1;
            while i < bytes.len() {
                match bytes[i] {
                    b'\\' => i += 2,
                    b'"' => return Some((start, start + i + 1, Quote::Double)),
                    _ => i += 1,
                }
            }
            None
        }
        b'\r' | b'\n' | b'#' | b'|' | b'>' | b'&' | b'*' | b'!' | b'{' | b'[' => None,
        _ => {
            let content = body.trim_end_matches(['\r', '\n']);
            let cut = comment_start(content).unwrap_or(content.len());
            let len = content[..cut].trim_end().len();
            Some((start, start + len, Quote::Plain))
        }
    }
}

/// Byte offset of a `#` that opens a comment: at the start or after blank space.
fn comment_start(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    (0..bytes.len())
        .find(|&i| bytes[i] == b'#' && (i == 0 || matches!(bytes[i - 1], b' ' | b'\t')))
}

fn render_scalar(value: &str, quote: Quote) -> String {
    match quote {
        Quote::Single => format!("'{}'", value.replace('\'', "''")),
        Quote::Double => format!(
            "\"{}\"",
            value.replace('\\', "\\\\").replace('"', "\\\"")
        ),
        Quote::Plain if needs_quotes(value) => render_scalar(value, Quote::Single),
        Quote::Plain => value.to_string(),
    }
}

/// True if a plain scalar would not read back as the same string.
fn needs_quotes(value: &str) -> bool {
    const INDICATORS: &str = "-?:,[]{}#&*!|>'\"%@`";
    const RESERVED: &[&str] = &[
        "true", "false", "yes", "no", "on", "off", "y", "n", "null", "~",
    ];

    let Some(first) = value.chars().next() else {
        return true;
    };

    value.trim() != value
        || INDICATORS.contains(first)
        || value.contains(": ")
        || value.contains(" #")
        || value.contains("\t#")
        || value.contains(['\n', '\t', '\r'])
        || RESERVED.contains(&value.to_ascii_lowercase().as_str())
        || value.parse::<f64>().is_ok()
}
