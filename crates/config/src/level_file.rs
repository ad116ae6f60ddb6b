//! In-memory form of one level file
//!
//! Level files are flat `name value` lines. Comments, blank lines and lines
//! naming unknown parameters are kept verbatim so a save only touches the
//! lines it has to. Lines naming known parameters are normalized on read:
//! lower-case name padded to [`NAME_COLUMN`], then the value.

use crate::{ConfigError, ConfigResult};
use marquee_core::Level;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Column at which values start on written lines
pub const NAME_COLUMN: usize = 40;

/// Formats a parameter line with the name padded to the value column
///
/// An empty value is written as `#` so that it reads back as empty.
pub fn format_line(name: &str, value: &str) -> String {
    let value = if value.is_empty() { "#" } else { value };
    let width = NAME_COLUMN.max(name.len() + 1);
    format!("{:<width$}{}", name, value, width = width)
}

/// Formats a documented-but-unset parameter line
pub fn format_commented_line(name: &str, value: &str) -> String {
    format!("#{}", format_line(name, value))
}

/// Collapses tabs and runs of spaces into single spaces and trims
pub fn normalize_line(raw: &str) -> String {
    raw.replace('\t', " ")
        .split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a line into name and value
///
/// Blank lines, comments and lines naming a parameter without a value yield
/// `None`. A lone `#` value stands for an empty string.
pub fn split_line(line: &str) -> Option<(&str, &str)> {
    let name = line_name(line)?;
    let value = line.trim()[name.len()..].trim();
    if value.is_empty() {
        return None;
    }
    Some((name, if value == "#" { "" } else { value }))
}

/// Decodes level-file bytes, falling back to Latin-1 for legacy files
pub(crate) fn decode_text(bytes: Vec<u8>, path: &Path) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("{} is not UTF-8, reading it as Latin-1", path.display());
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// First word of a non-comment line
pub fn line_name(line: &str) -> Option<&str> {
    let clean = line.trim();
    if clean.is_empty() || clean.starts_with('#') {
        return None;
    }
    clean.split([' ', '\t']).next()
}

/// Header written at the top of newly created level files
pub fn seed_header(level: Level, year: i32) -> Vec<String> {
    if level == Level::Item {
        return vec!["# Auto-generated file: add custom configuration params here".to_string()];
    }
    let rule = "#".repeat(78);
    vec![
        rule.clone(),
        "#".to_string(),
        format!("# Marquee front-end configuration - {} level", level),
        format!("# Generated {}", year),
        "#".to_string(),
        rule,
        String::new(),
    ]
}

/// Ordered lines of one level file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelFile {
    lines: Vec<String>,
}

impl LevelFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Parses file text, normalizing lines whose name satisfies `is_known`
    pub fn parse(text: &str, is_known: impl Fn(&str) -> bool) -> Self {
        let lines = text
            .lines()
            .map(|original| {
                let line = normalize_line(original);
                if line.is_empty() || line.starts_with('#') {
                    return original.to_string();
                }
                let Some((name, value)) = line.split_once(' ') else {
                    return original.to_string();
                };
                let name = name.to_lowercase();
                if is_known(&name) {
                    format_line(&name, value)
                } else {
                    original.to_string()
                }
            })
            .collect();
        Self { lines }
    }

    /// Reads a level file; a missing file reads as empty
    ///
    /// Files that are not UTF-8 are read as Latin-1.
    pub fn read(path: &Path, is_known: impl Fn(&str) -> bool) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let bytes = fs::read(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::parse(&decode_text(bytes, path), is_known))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Name/value pairs of every line that sets a value, in file order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().filter_map(|line| split_line(line))
    }

    /// Value of the last line setting `name`
    pub fn find_last(&self, name: &str) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .filter_map(|line| split_line(line))
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// True when some line names `name`, with or without a value
    pub fn contains(&self, name: &str) -> bool {
        self.lines.iter().any(|line| line_name(line) == Some(name))
    }

    /// True when `name` appears commented out (`#name value`)
    pub fn contains_commented(&self, name: &str) -> bool {
        let prefix = format!("#{} ", name);
        self.lines.iter().any(|line| line.starts_with(&prefix))
    }

    /// File text, one line per entry
    pub fn render(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}
