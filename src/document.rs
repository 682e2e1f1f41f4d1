//! Section-addressable view of a bracketed key/value settings file.
//!
//! The document keeps the file's raw lines, terminators included, so that
//! replacing one section leaves every other byte of the file as it was.
//!
//! A section starts at a line whose trimmed text is `[name]` (compared
//! case-insensitively) and runs until the line before the next line that
//! starts with `[`, or the end of the file.

use crate::error::{Result, SyncError};
use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One named section: its header line and body lines, verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSection {
    header: String,
    body: Vec<String>,
}

impl ConfigSection {
    /// Build a section from raw lines; the first line is the header
    #[must_use]
    pub fn from_lines(lines: &[String]) -> Option<Self> {
        let (header, body) = lines.split_first()?;
        Some(Self {
            header: header.clone(),
            body: body.to_vec(),
        })
    }

    /// Header line as it appears in the file, e.g. `"[Recent]\n"`
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Lines after the header, up to the next section
    #[must_use]
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Header followed by the body
    pub fn lines(&self) -> impl Iterator<Item = &String> {
        std::iter::once(&self.header).chain(self.body.iter())
    }
}

impl fmt::Display for ConfigSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// In-memory lines of a settings file, written back on every effective change
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    path: PathBuf,
    lines: Vec<String>,
}

impl ConfigDocument {
    /// Read a document from disk.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Io`] if the file cannot be read
    /// - [`SyncError::Malformed`] if it looks binary or is not valid UTF-8
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| SyncError::io(path, e))?;

        if content_inspector::inspect(&bytes).is_binary() {
            return Err(SyncError::malformed(path, "file looks binary"));
        }

        let text = simdutf8::basic::from_utf8(&bytes)
            .map_err(|_| SyncError::malformed(path, "file is not valid UTF-8"))?;

        Ok(Self::parse(path, text))
    }

    /// Build a document from text already in memory
    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            lines: text.split_inclusive('\n').map(String::from).collect(),
        }
    }

    /// File the document was read from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw lines, terminators included
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Full text of the document
    #[must_use]
    pub fn render(&self) -> String {
        self.lines.concat()
    }

    /// Extract the first section named `name`
    #[must_use]
    pub fn get_section(&self, name: &str) -> Option<ConfigSection> {
        let range = self.find_section(name)?;
        ConfigSection::from_lines(&self.lines[range])
    }

    /// Number of headers matching `name`; more than one is unsupported and
    /// only the first is ever read or replaced
    #[must_use]
    pub fn count_sections(&self, name: &str) -> usize {
        self.lines
            .iter()
            .filter(|line| matches_header(line, name))
            .count()
    }

    /// Replace the section named `name` with `section`, or append it when the
    /// document has no such section, then rewrite the file.
    ///
    /// Returns `false` without touching the file when the document already
    /// holds exactly this content.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if the file cannot be written.
    pub fn overwrite_section(&mut self, name: &str, section: &ConfigSection) -> Result<bool> {
        let updated = self.spliced(name, section);
        if updated == self.lines {
            debug!(path = %self.path.display(), section = name, "Section already current");
            return Ok(false);
        }

        self.lines = updated;
        self.save()?;
        debug!(path = %self.path.display(), section = name, "Section overwritten");
        Ok(true)
    }

    /// Whether [`Self::overwrite_section`] with `section` would change the
    /// document
    #[must_use]
    pub fn would_change(&self, name: &str, section: &ConfigSection) -> bool {
        self.spliced(name, section) != self.lines
    }

    /// `section` as [`Self::overwrite_section`] would write it into this
    /// document, line terminators included
    #[must_use]
    pub fn incoming(&self, name: &str, section: &ConfigSection) -> ConfigSection {
        let mut lines: Vec<String> = section.lines().cloned().collect();
        if let Some(range) = self.find_section(name)
            && range.end < self.lines.len()
            && let Some(last) = lines.last_mut()
            && !last.ends_with('\n')
        {
            last.push_str(self.line_ending());
        }
        ConfigSection::from_lines(&lines).unwrap_or_else(|| section.clone())
    }

    /// Write the whole document back to its file
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, self.render()).map_err(|e| SyncError::io(&self.path, e))
    }

    fn find_section(&self, name: &str) -> Option<Range<usize>> {
        let start = self.lines.iter().position(|line| matches_header(line, name))?;
        let end = self.lines[start + 1..]
            .iter()
            .position(|line| line.starts_with('['))
            .map_or(self.lines.len(), |offset| start + 1 + offset);
        Some(start..end)
    }

    fn line_ending(&self) -> &'static str {
        if self.lines.iter().any(|line| line.ends_with("\r\n")) {
            "\r\n"
        } else {
            "\n"
        }
    }

    fn spliced(&self, name: &str, section: &ConfigSection) -> Vec<String> {
        let incoming = self.incoming(name, section);

        match self.find_section(name) {
            Some(range) => {
                let mut lines = Vec::with_capacity(self.lines.len() + incoming.body.len() + 1);
                lines.extend_from_slice(&self.lines[..range.start]);
                lines.extend(incoming.lines().cloned());
                lines.extend_from_slice(&self.lines[range.end..]);
                lines
            }
            None => {
                let mut lines = self.lines.clone();
                if let Some(last) = lines.last_mut()
                    && !last.ends_with('\n')
                {
                    last.push_str(self.line_ending());
                }
                lines.extend(incoming.lines().cloned());
                lines
            }
        }
    }
}

fn matches_header(line: &str, name: &str) -> bool {
    let trimmed = line.trim();
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .is_some_and(|inner| inner.to_lowercase() == name.to_lowercase())
}
