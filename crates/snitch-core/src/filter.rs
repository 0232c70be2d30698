//! Include/exclude filtering of records.
//!
//! Patterns are compiled once at startup into a [`FilterSet`] and shared
//! read-only by every worker. A malformed pattern is a startup error; there
//! is no way to add or change patterns afterwards.

use crate::record::Record;
use regex::Regex;
use thiserror::Error;

/// A pattern that failed to compile, with enough context to fix it.
#[derive(Debug, Error)]
#[error("invalid {kind} pattern `{pattern}`: {source}")]
pub struct FilterError {
    kind: &'static str,
    pattern: String,
    #[source]
    source: regex::Error,
}

/// Compiled include and exclude matchers.
#[derive(Debug, Default)]
pub struct FilterSet {
    includes: Vec<Regex>,
    excludes: Vec<Regex>,
}

impl FilterSet {
    /// Compile both pattern lists. Fails on the first malformed pattern.
    pub fn compile(includes: &[String], excludes: &[String]) -> Result<Self, FilterError> {
        Ok(Self {
            includes: compile_all(includes, "include")?,
            excludes: compile_all(excludes, "exclude")?,
        })
    }

    /// A set with no patterns: everything non-blank is kept.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decide whether a record survives filtering.
    ///
    /// Include patterns use AND semantics: when the include list is
    /// non-empty, the record must match every one of them, not just any.
    /// A record matching any exclude pattern is dropped even if it passed
    /// the includes, and blank records are always dropped.
    pub fn should_keep(&self, record: &Record) -> bool {
        if !self.includes.iter().all(|re| re.is_match(record.text())) {
            return false;
        }
        if self.excludes.iter().any(|re| re.is_match(record.text())) {
            return false;
        }
        !record.is_blank()
    }
}

fn compile_all(patterns: &[String], kind: &'static str) -> Result<Vec<Regex>, FilterError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| FilterError {
                kind,
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}
