//! Byte-stream segmentation into logical records.
//!
//! Journald renders a multi-line entry as one header line followed by
//! indented continuation lines. The segmenter applies that convention to an
//! arbitrary byte stream: a new record starts at a line whose first
//! character is non-whitespace (a "boundary"); everything between two
//! boundaries is one record.
//!
//! The segmenter never performs I/O. The stream owner appends chunks with
//! [`Segmenter::push`], drains complete records with
//! [`Segmenter::next_record`], and flushes the tail with
//! [`Segmenter::finish`] at end of stream.

use crate::record::Record;
use regex::bytes::Regex;
use serde::Deserialize;

/// When to emit a record whose end is not yet proven by a following
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlushMode {
    /// Flush the whole buffer as soon as its only boundary is the buffer
    /// start. Journal entries usually arrive whole, so this keeps latency
    /// minimal, but a record whose continuation lines lag behind the header
    /// gets split across notifications.
    #[default]
    Eager,
    /// Emit a record only once the next record's boundary is visible. The
    /// final record is flushed by [`Segmenter::finish`] at end of stream.
    Boundary,
}

impl std::str::FromStr for FlushMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eager" => Ok(FlushMode::Eager),
            "boundary" => Ok(FlushMode::Boundary),
            other => Err(format!("unknown flush mode `{other}` (expected `eager` or `boundary`)")),
        }
    }
}

impl std::fmt::Display for FlushMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlushMode::Eager => write!(f, "eager"),
            FlushMode::Boundary => write!(f, "boundary"),
        }
    }
}

/// Incremental segmenter over an accumulating byte buffer.
///
/// Cut rule, given the boundary positions in the buffer:
/// - no boundary: need more data;
/// - first boundary past the start: the bytes before it are an orphan
///   record (the stream began mid-entry), cut there;
/// - boundary at the start plus a second one: cut at the second;
/// - boundary at the start only: in [`FlushMode::Eager`] the whole buffer
///   is one record, in [`FlushMode::Boundary`] wait for more data.
#[derive(Debug)]
pub struct Segmenter {
    boundary: Regex,
    buf: Vec<u8>,
    mode: FlushMode,
}

impl Segmenter {
    pub fn new(mode: FlushMode) -> Self {
        Self {
            boundary: Regex::new(r"(?m)^\S").expect("boundary pattern must be valid"),
            buf: Vec::new(),
            mode,
        }
    }

    /// Append a chunk of stream bytes to the internal buffer.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Cut the next complete record off the front of the buffer, or return
    /// `None` when more data is needed. Call repeatedly until `None` after
    /// each [`push`](Self::push); a single chunk can hold several records.
    pub fn next_record(&mut self) -> Option<Record> {
        let cut = self.find_cut()?;
        let rest = self.buf.split_off(cut);
        let head = std::mem::replace(&mut self.buf, rest);
        Some(Record::new(String::from_utf8_lossy(&head).into_owned()))
    }

    /// Flush whatever remains at end of stream. Returns `None` when the
    /// buffer is empty.
    pub fn finish(&mut self) -> Option<Record> {
        if self.buf.is_empty() {
            return None;
        }
        let tail = std::mem::take(&mut self.buf);
        Some(Record::new(String::from_utf8_lossy(&tail).into_owned()))
    }

    /// Bytes currently buffered without a decided record end.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    fn find_cut(&self) -> Option<usize> {
        let mut boundaries = self.boundary.find_iter(&self.buf).map(|m| m.start());
        match boundaries.next() {
            None => None,
            // Stream began mid-entry: the leading continuation lines are
            // emitted as an orphan record.
            Some(first) if first > 0 => Some(first),
            Some(_) => match boundaries.next() {
                Some(second) => Some(second),
                None => match self.mode {
                    FlushMode::Eager => Some(self.buf.len()),
                    FlushMode::Boundary => None,
                },
            },
        }
    }
}
