//! The logical record unit flowing through the pipeline.
//!
//! A [`Record`] is one journal entry as cut by the segmenter: a header line
//! followed by zero or more continuation lines. Records are immutable once
//! emitted; ownership moves from the segmenter to the worker that processes
//! them.

/// One logical journal record.
///
/// The text keeps its physical line structure, trailing newlines included.
/// The first line is the header; any following lines begin with whitespace
/// and continue the same entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    text: String,
}

impl Record {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Full record text, newlines included.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The header line (first physical line) of the record.
    pub fn header(&self) -> &str {
        self.text.lines().next().unwrap_or("")
    }

    /// True when the record contains nothing but whitespace. Blank records
    /// are never dispatched, whatever the filter configuration says.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of physical lines in the record.
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
