use clap::{ArgAction, Parser};
use snitch::{run, Source};
use snitch_core::{Config, FlushMode, OverflowPolicy};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snitch")]
#[command(about = "Posts multi-line journal records to a Mattermost webhook")]
#[command(version)]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/snitch/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Bot username shown on each post
    #[arg(short = 'u', long, value_name = "NAME")]
    username: Option<String>,

    /// Incoming webhook URL
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Attachment sidebar color
    #[arg(long, value_name = "HEX")]
    color: Option<String>,

    /// Text prepended to every notification
    #[arg(short = 'p', long, value_name = "TEXT")]
    prefix: Option<String>,

    /// Code-block syntax hint for plain (non-attachment) posts
    #[arg(long, value_name = "LANG")]
    syntax: Option<String>,

    /// Post plain text instead of a colored attachment
    #[arg(long)]
    no_attach: bool,

    /// Only post records matching this regex (repeatable; all must match)
    #[arg(short = 'i', long = "include", value_name = "REGEX", action = ArgAction::Append)]
    include: Vec<String>,

    /// Drop records matching this regex (repeatable; any match drops)
    #[arg(short = 'x', long = "exclude", value_name = "REGEX", action = ArgAction::Append)]
    exclude: Vec<String>,

    /// Extra journalctl arguments, as one shell-quoted string
    #[arg(long, value_name = "ARGS")]
    param: Option<String>,

    /// Read from stdin instead of spawning journalctl
    #[arg(long)]
    stdin: bool,

    /// When to flush a buffer holding a single record head: eager or boundary
    #[arg(long, value_name = "MODE")]
    flush: Option<FlushMode>,

    /// What a full queue does with new records: block or drop-oldest
    #[arg(long, value_name = "POLICY")]
    overflow: Option<OverflowPolicy>,

    /// Delivery worker count
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Bounded record queue depth
    #[arg(long, value_name = "N")]
    queue_depth: Option<usize>,

    /// Retries after the first failed delivery attempt
    #[arg(long, value_name = "N")]
    max_retries: Option<u32>,

    /// How long shutdown waits for in-flight deliveries
    #[arg(long, value_name = "MS")]
    drain_timeout_ms: Option<u64>,

    /// Log debug detail to stderr
    #[arg(short = 'd', long)]
    debug: bool,
}

impl Cli {
    /// Flags win over the config file; list flags replace, never merge.
    fn apply(&self, cfg: &mut Config) {
        if let Some(v) = &self.username {
            cfg.notify.username = v.clone();
        }
        if let Some(v) = &self.url {
            cfg.notify.webhook_url = v.clone();
        }
        if let Some(v) = &self.color {
            cfg.notify.color = v.clone();
        }
        if let Some(v) = &self.prefix {
            cfg.notify.prefix = v.clone();
        }
        if let Some(v) = &self.syntax {
            cfg.notify.syntax = v.clone();
        }
        if self.no_attach {
            cfg.notify.attach = false;
        }
        if !self.include.is_empty() {
            cfg.filter.include = self.include.clone();
        }
        if !self.exclude.is_empty() {
            cfg.filter.exclude = self.exclude.clone();
        }
        if let Some(v) = &self.param {
            cfg.journal.args = v.clone();
        }
        if let Some(v) = self.flush {
            cfg.pipeline.flush = v;
        }
        if let Some(v) = self.overflow {
            cfg.pipeline.overflow = v;
        }
        if let Some(v) = self.workers {
            cfg.pipeline.workers = v;
        }
        if let Some(v) = self.queue_depth {
            cfg.pipeline.queue_depth = v;
        }
        if let Some(v) = self.max_retries {
            cfg.delivery.max_retries = v;
        }
        if let Some(v) = self.drain_timeout_ms {
            cfg.pipeline.drain_timeout_ms = v;
        }
    }
}

fn init_tracing(debug: bool) {
    let fallback = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut cfg = Config::load(cli.config.as_deref())?;
    cli.apply(&mut cfg);

    let source = if cli.stdin {
        Source::Stdin
    } else {
        Source::Journal
    };

    let report = run(cfg, source).await?;
    tracing::info!(
        segmented = report.segmented,
        filtered = report.filtered,
        delivered = report.delivered,
        failed = report.failed,
        dropped = report.dropped,
        "run finished"
    );
    Ok(())
}
