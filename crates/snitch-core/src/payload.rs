//! Webhook payload construction.
//!
//! Two shapes, selected by the `attach` setting: a rich attachment
//! (fallback/color/pretext/text) or a plain message with the record inside
//! a fenced code block. Field names match Mattermost incoming webhooks.
//! Building a payload is a pure transformation; the same record and config
//! always produce byte-identical JSON.

use crate::config::NotifyConfig;
use crate::record::Record;
use serde::Serialize;

/// Wire payload POSTed to the webhook. `username` is always serialized,
/// even when empty; exactly one of `text` and `attachments` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

/// One rich attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub fallback: String,
    pub color: String,
    pub pretext: String,
    pub text: String,
}

impl Payload {
    /// Build the payload for one surviving record. `source` is the stream
    /// label shown in the message ("journal" or "stdin").
    pub fn build(record: &Record, notify: &NotifyConfig, source: &str) -> Self {
        if notify.attach {
            Self::attachment(record, notify, source)
        } else {
            Self::plain(record, notify, source)
        }
    }

    fn attachment(record: &Record, notify: &NotifyConfig, source: &str) -> Self {
        Payload {
            username: notify.username.clone(),
            text: None,
            attachments: Some(vec![Attachment {
                fallback: fallback_summary(record, source),
                color: notify.color.clone(),
                pretext: format!("{} New log entry in {}", notify.prefix, source),
                // Two leading spaces, kept verbatim by Mattermost.
                text: format!("  {}", record.text()),
            }]),
        }
    }

    fn plain(record: &Record, notify: &NotifyConfig, source: &str) -> Self {
        Payload {
            username: notify.username.clone(),
            text: Some(format!(
                "{} New log entry in {}\n```{}\n{}\n```",
                notify.prefix,
                source,
                notify.syntax,
                record.text()
            )),
            attachments: None,
        }
    }
}

/// Summarize a record by its first and last character. Deliberately not a
/// line-aware summary; the truncation marker sits between two single
/// characters however long the record is.
fn fallback_summary(record: &Record, source: &str) -> String {
    let first = record.text().chars().next().unwrap_or(' ');
    let last = record.text().chars().last().unwrap_or(' ');
    format!("New log entry in {source}. \n{first}\n[...]{last}\n")
}
