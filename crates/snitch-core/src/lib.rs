//! snitch-core — pure pipeline stages for the snitch notifier.
//!
//! # Architecture
//!
//! ```text
//! journalctl ──► Segmenter ──► queue ──► workers: FilterSet ─► Payload ─► POST
//! ```
//!
//! Everything in this crate is synchronous and I/O-free: segmentation,
//! filtering, payload construction, and the configuration types. The binary
//! crate owns the runtime, the child process, and the HTTP client, so these
//! stages stay trivially unit-testable.

pub mod config;
pub mod filter;
pub mod payload;
pub mod record;
pub mod segment;

pub use config::{Config, OverflowPolicy};
pub use filter::{FilterError, FilterSet};
pub use payload::{Attachment, Payload};
pub use record::Record;
pub use segment::{FlushMode, Segmenter};
