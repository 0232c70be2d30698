//! Run loop: wires a byte source into the segmenter, the bounded queue,
//! and the delivery pool, then owns drain and the final report.
//!
//! Two entry points: [`run`] is the full binary path (signal handling,
//! `journalctl` lifecycle), [`run_stream`] is the headless core that the
//! integration harnesses drive with in-memory streams.

use crate::journal;
use crate::pool::{spawn_workers, RecordQueue, Stats, WorkerCtx};
use crate::shutdown;
use crate::tailer;
use crate::webhook::Webhook;
use anyhow::Context;
use snitch_core::{Config, FilterSet, FlushMode, Segmenter};
use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio::task::JoinHandle;

/// Where records come from. The label shows up in every notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Journal,
    Stdin,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Journal => f.write_str("journal"),
            Source::Stdin => f.write_str("stdin"),
        }
    }
}

/// Counters for one run, reported once the pipeline has drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub segmented: u64,
    pub filtered: u64,
    pub delivered: u64,
    pub failed: u64,
    pub dropped: u64,
}

/// A started pipeline: queue, worker pool, and the knobs needed to tail
/// a stream into it and to drain it afterwards.
struct Engine {
    queue: Arc<RecordQueue>,
    workers: Vec<JoinHandle<()>>,
    stats: Arc<Stats>,
    flush: FlushMode,
    drain: Duration,
}

impl Engine {
    fn start(cfg: &Config, source: String) -> anyhow::Result<Self> {
        let filters = FilterSet::compile(&cfg.filter.include, &cfg.filter.exclude)?;
        let webhook = Webhook::new(cfg.notify.webhook_url.clone(), &cfg.delivery)
            .context("failed to build HTTP client")?;

        let queue = Arc::new(RecordQueue::new(
            cfg.pipeline.queue_depth,
            cfg.pipeline.overflow,
        ));
        let stats = Arc::new(Stats::default());
        let ctx = Arc::new(WorkerCtx {
            filters,
            notify: cfg.notify.clone(),
            source,
            webhook,
        });
        let workers = spawn_workers(
            cfg.pipeline.workers,
            Arc::clone(&queue),
            ctx,
            Arc::clone(&stats),
        );

        Ok(Self {
            queue,
            workers,
            stats,
            flush: cfg.pipeline.flush,
            drain: Duration::from_millis(cfg.pipeline.drain_timeout_ms),
        })
    }

    async fn tail<R, S>(&self, reader: R, stop: S) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
        S: std::future::Future<Output = ()>,
    {
        tailer::run(reader, Segmenter::new(self.flush), &self.queue, &self.stats, stop).await
    }

    /// Close the queue, wait for the workers to drain it, and report.
    async fn shutdown(self) -> Report {
        self.queue.close();

        let join = async {
            for worker in self.workers {
                let _ = worker.await;
            }
        };
        if tokio::time::timeout(self.drain, join).await.is_err() {
            tracing::warn!(
                timeout_ms = self.drain.as_millis() as u64,
                "drain timed out with deliveries still in flight"
            );
        }

        let dropped = self.queue.dropped();
        if dropped > 0 {
            tracing::warn!(dropped, "records discarded under backpressure");
        }

        Report {
            segmented: self.stats.segmented.load(Ordering::Relaxed),
            filtered: self.stats.filtered.load(Ordering::Relaxed),
            delivered: self.stats.delivered.load(Ordering::Relaxed),
            failed: self.stats.failed.load(Ordering::Relaxed),
            dropped,
        }
    }
}

/// Tail the configured source until it ends or a shutdown signal arrives,
/// then drain the queue and return the run's counters.
pub async fn run(cfg: Config, source: Source) -> anyhow::Result<Report> {
    cfg.validate()?;
    let engine = Engine::start(&cfg, source.to_string())?;

    match source {
        Source::Journal => {
            let args = cfg.journal_args()?;
            let (mut child, stdout) = journal::spawn(&args)?;
            let tail = engine.tail(stdout, std::future::pending());
            tokio::pin!(tail);

            tokio::select! {
                res = &mut tail => {
                    let tail_failed = res.is_err();
                    if let Err(err) = res {
                        tracing::error!(error = %err, "journal stream failed");
                    }
                    reap_journal(child, tail_failed).await;
                }
                _ = shutdown::signal() => {
                    // Killing the child closes the pipe, so the tail sees
                    // EOF and flushes whatever it was still buffering.
                    let _ = child.start_kill();
                    if let Err(err) = (&mut tail).await {
                        tracing::error!(error = %err, "journal stream failed");
                    }
                    let _ = child.wait().await;
                }
            }
        }
        Source::Stdin => {
            // The signal stops the read inside the tailer, which flushes
            // whatever the segmenter was still buffering before returning.
            if let Err(err) = engine.tail(tokio::io::stdin(), shutdown::signal()).await {
                tracing::error!(error = %err, "stdin stream failed");
            }
        }
    }

    Ok(engine.shutdown().await)
}

/// Wait out the journalctl child. A failed tail leaves a `--follow` child
/// alive with nobody reading its pipe, so it is killed before the wait.
async fn reap_journal(mut child: tokio::process::Child, tail_failed: bool) {
    if tail_failed {
        let _ = child.start_kill();
    }
    match child.wait().await {
        Ok(status) if !status.success() => {
            tracing::warn!(%status, "journalctl exited");
        }
        Ok(_) => {}
        Err(err) => {
            tracing::warn!(error = %err, "failed to reap journalctl");
        }
    }
}

/// Run the pipeline over any byte stream until EOF, then drain and report.
pub async fn run_stream<R: AsyncRead + Unpin>(
    cfg: &Config,
    source: &str,
    reader: R,
) -> anyhow::Result<Report> {
    let engine = Engine::start(cfg, source.to_string())?;
    if let Err(err) = engine.tail(reader, std::future::pending()).await {
        tracing::error!(error = %err, source, "stream failed");
    }
    Ok(engine.shutdown().await)
}
