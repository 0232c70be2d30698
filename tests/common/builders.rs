//! Test builders — ergonomic constructors for `Config` and `Record` fixtures.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use snitch_core::{Config, FlushMode, OverflowPolicy, Record};

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Config`] test fixtures.
///
/// Starts from the embedded defaults, so a test states only what it cares
/// about. The webhook URL is mandatory because nearly every harness points
/// it at a fake server.
///
/// # Example
///
/// ```rust
/// let cfg = ConfigBuilder::new(hook.url())
///     .include("ERROR")
///     .exclude("healthcheck")
///     .workers(2)
///     .build();
/// ```
pub struct ConfigBuilder {
    cfg: Config,
}

impl ConfigBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        let mut cfg = Config::defaults();
        cfg.notify.webhook_url = url.into();
        cfg.notify.username = "snitch-test".to_string();
        Self { cfg }
    }

    pub fn username(mut self, name: &str) -> Self {
        self.cfg.notify.username = name.to_string();
        self
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.cfg.notify.prefix = prefix.to_string();
        self
    }

    /// Switch to plain text posts with the given code-block syntax.
    pub fn plain(mut self, syntax: &str) -> Self {
        self.cfg.notify.attach = false;
        self.cfg.notify.syntax = syntax.to_string();
        self
    }

    pub fn include(mut self, pattern: &str) -> Self {
        self.cfg.filter.include.push(pattern.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.cfg.filter.exclude.push(pattern.to_string());
        self
    }

    pub fn flush(mut self, mode: FlushMode) -> Self {
        self.cfg.pipeline.flush = mode;
        self
    }

    pub fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.cfg.pipeline.overflow = policy;
        self
    }

    pub fn workers(mut self, n: usize) -> Self {
        self.cfg.pipeline.workers = n;
        self
    }

    pub fn queue_depth(mut self, n: usize) -> Self {
        self.cfg.pipeline.queue_depth = n;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.cfg.delivery.max_retries = n;
        self
    }

    pub fn retry_base_delay_ms(mut self, ms: u64) -> Self {
        self.cfg.delivery.retry_base_delay_ms = ms;
        self
    }

    pub fn drain_timeout_ms(mut self, ms: u64) -> Self {
        self.cfg.pipeline.drain_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.cfg
    }
}

// ---------------------------------------------------------------------------
// Record shorthand
// ---------------------------------------------------------------------------

/// Shorthand for a [`Record`] with the given text.
pub fn record(text: &str) -> Record {
    Record::new(text)
}
