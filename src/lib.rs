//! snitch — journal-to-Mattermost notifier
//!
//! Tails `journalctl --follow` (or stdin), stitches continuation lines back
//! into whole multi-line records, filters them, and posts each survivor to a
//! Mattermost-compatible incoming webhook. The pipeline stages live in this
//! crate as public modules so that the integration harnesses can drive them
//! directly; the pure, I/O-free stages live in `snitch-core`.
//!
//! # Architecture
//!
//! ```text
//! journalctl ─┐
//!             ├──► tailer ──► Segmenter ──► RecordQueue ──► workers ──► Webhook
//! stdin ──────┘                            (bounded)       (filter → format
//!                                                           → deliver)
//! ```
//!
//! One task reads the byte stream and feeds the segmenter; a pool of worker
//! tasks pulls finished records off the bounded queue, so a slow webhook
//! backs pressure onto the reader instead of growing memory without bound.

pub mod app;
pub mod journal;
pub mod pool;
pub mod shutdown;
pub mod tailer;
pub mod webhook;

pub use app::{run, run_stream, Report, Source};
