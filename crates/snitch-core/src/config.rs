//! Configuration types for snitch.
//!
//! [`Config::load`] layers an optional TOML file over built-in defaults;
//! the binary applies CLI flag overrides on top of the loaded value.
//! [`Config::defaults`] returns the built-ins without touching the
//! filesystem (useful in tests). The value is immutable once the pipeline
//! starts; components receive it (or its sections) by reference.

use crate::segment::FlushMode;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r##"
[notify]
username    = ""
webhook_url = ""
color       = "#FF0000"
prefix      = ":warning:"
syntax      = ""
attach      = true

[filter]
include = []
exclude = []

[journal]
args = ""

[pipeline]
workers          = 8
queue_depth      = 64
overflow         = "block"
flush            = "eager"
drain_timeout_ms = 5000

[delivery]
max_retries         = 3
retry_base_delay_ms = 250
timeout_ms          = 10000
"##;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

/// `[notify]` section: what gets posted, and where.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub syntax: String,
    #[serde(default = "default_attach")]
    pub attach: bool,
}

fn default_color() -> String { "#FF0000".to_string() }
fn default_prefix() -> String { ":warning:".to_string() }
fn default_attach() -> bool { true }

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            webhook_url: String::new(),
            color: default_color(),
            prefix: default_prefix(),
            syntax: String::new(),
            attach: default_attach(),
        }
    }
}

/// `[filter]` section: raw pattern lists, compiled at startup by
/// [`crate::FilterSet::compile`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// `[journal]` section: extra arguments appended to `journalctl --follow`,
/// as one shell-quoted string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JournalConfig {
    #[serde(default)]
    pub args: String,
}

/// `[pipeline]` section: segmentation and concurrency knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
    #[serde(default)]
    pub overflow: OverflowPolicy,
    #[serde(default)]
    pub flush: FlushMode,
    #[serde(default = "default_drain_timeout_ms")]
    pub drain_timeout_ms: u64,
}

fn default_workers() -> usize { 8 }
fn default_queue_depth() -> usize { 64 }
fn default_drain_timeout_ms() -> u64 { 5000 }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_depth: default_queue_depth(),
            overflow: OverflowPolicy::default(),
            flush: FlushMode::default(),
            drain_timeout_ms: default_drain_timeout_ms(),
        }
    }
}

/// `[delivery]` section: HTTP timeout and the transient retry policy.
/// `max_retries` counts additional attempts after the first.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_max_retries() -> u32 { 3 }
fn default_retry_base_delay_ms() -> u64 { 250 }
fn default_timeout_ms() -> u64 { 10_000 }

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// What the record queue does when it is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Wait for space; backpressure reaches the stream reader.
    #[default]
    Block,
    /// Discard the oldest queued record to make room; the reader never
    /// waits. Drops are counted and reported at shutdown.
    DropOldest,
}

impl std::str::FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "block" => Ok(OverflowPolicy::Block),
            "drop-oldest" => Ok(OverflowPolicy::DropOldest),
            other => {
                Err(format!("unknown overflow policy `{other}` (expected `block` or `drop-oldest`)"))
            }
        }
    }
}

impl std::fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverflowPolicy::Block => write!(f, "block"),
            OverflowPolicy::DropOldest => write!(f, "drop-oldest"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the configuration, layered on top of the built-in defaults.
    ///
    /// With an explicit `path` the file must exist and parse. Without one,
    /// `~/.config/snitch/config.toml` is used and created with the defaults
    /// if missing.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));

        let builder = match path {
            Some(explicit) => builder.add_source(config::File::from(explicit).required(true)),
            None => {
                let default_path = config_path();
                if !default_path.exists() {
                    if let Some(parent) = default_path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&default_path, DEFAULT_CONFIG.trim_start())?;
                }
                builder.add_source(config::File::from(default_path.as_path()).required(false))
            }
        };

        builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("failed to parse configuration")
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Split the extra journalctl argument string the way a shell would.
    pub fn journal_args(&self) -> anyhow::Result<Vec<String>> {
        shell_words::split(&self.journal.args).with_context(|| {
            format!("malformed journalctl argument string `{}`", self.journal.args)
        })
    }

    /// Startup validation. Everything checked here is fatal: the process
    /// must not begin tailing with a malformed setup.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.notify.webhook_url.is_empty(),
            "webhook URL is required (pass --url or set [notify] webhook_url)"
        );
        anyhow::ensure!(self.pipeline.workers > 0, "[pipeline] workers must be at least 1");
        anyhow::ensure!(
            self.pipeline.queue_depth > 0,
            "[pipeline] queue_depth must be at least 1"
        );
        self.journal_args()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("snitch")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
