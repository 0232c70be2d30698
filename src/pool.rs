//! Bounded hand-off between the tailer and the delivery workers.
//!
//! The [`RecordQueue`] is the pipeline's backpressure point: the tailer
//! pushes records in, a fixed pool of workers pulls them out and runs
//! filter → format → deliver for each one. When the queue is full the
//! configured [`OverflowPolicy`] decides whether the tailer waits or the
//! oldest queued record is discarded. Closing the queue lets workers drain
//! what is left and then stop.

use snitch_core::config::NotifyConfig;
use snitch_core::{FilterSet, OverflowPolicy, Payload, Record};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;

use crate::webhook::Webhook;

/// Run counters, shared by the tailer and the workers.
#[derive(Debug, Default)]
pub struct Stats {
    pub segmented: AtomicU64,
    pub filtered: AtomicU64,
    pub delivered: AtomicU64,
    pub failed: AtomicU64,
}

/// Bounded FIFO of records with a configurable full-queue policy.
pub struct RecordQueue {
    inner: Mutex<VecDeque<Record>>,
    /// Permits for queued records; closed to initiate drain.
    items: Semaphore,
    /// Permits for free slots; only consulted by the `Block` policy.
    space: Semaphore,
    policy: OverflowPolicy,
    capacity: usize,
    dropped: AtomicU64,
}

impl RecordQueue {
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            items: Semaphore::new(0),
            space: Semaphore::new(capacity),
            policy,
            capacity,
            dropped: AtomicU64::new(0),
        }
    }

    /// Queue one record. `Block` waits for a free slot; `DropOldest`
    /// discards the head of the queue to make room and never waits.
    /// Pushing to a closed queue silently discards the record.
    pub async fn push(&self, record: Record) {
        match self.policy {
            OverflowPolicy::Block => {
                let Ok(permit) = self.space.acquire().await else {
                    return;
                };
                permit.forget();
                self.inner.lock().await.push_back(record);
                self.items.add_permits(1);
            }
            OverflowPolicy::DropOldest => {
                if self.items.is_closed() {
                    return;
                }
                let mut queue = self.inner.lock().await;
                if queue.len() >= self.capacity {
                    queue.pop_front();
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                    queue.push_back(record);
                    // Length unchanged, so the item permit count still fits.
                } else {
                    queue.push_back(record);
                    self.items.add_permits(1);
                }
            }
        }
    }

    /// Take the next record, waiting for one to arrive. Returns `None` once
    /// the queue has been closed and fully drained.
    pub async fn pop(&self) -> Option<Record> {
        match self.items.acquire().await {
            Ok(permit) => {
                permit.forget();
                let record = self.inner.lock().await.pop_front();
                if self.policy == OverflowPolicy::Block {
                    self.space.add_permits(1);
                }
                record
            }
            // Closed: hand out whatever is left, then None.
            Err(_) => self.inner.lock().await.pop_front(),
        }
    }

    /// Close the queue. Pending and future pops drain the remaining records
    /// and then return `None`; pending pushes are released empty-handed.
    pub fn close(&self) {
        self.items.close();
        self.space.close();
    }

    /// Records discarded by the `DropOldest` policy so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Everything a worker needs, shared read-only across the pool.
pub struct WorkerCtx {
    pub filters: FilterSet,
    pub notify: NotifyConfig,
    pub source: String,
    pub webhook: Webhook,
}

/// Spawn `n` workers pulling from the queue until it closes and drains.
pub fn spawn_workers(
    n: usize,
    queue: Arc<RecordQueue>,
    ctx: Arc<WorkerCtx>,
    stats: Arc<Stats>,
) -> Vec<JoinHandle<()>> {
    (0..n)
        .map(|id| {
            let queue = Arc::clone(&queue);
            let ctx = Arc::clone(&ctx);
            let stats = Arc::clone(&stats);
            tokio::spawn(async move {
                tracing::debug!(worker = id, "worker started");
                while let Some(record) = queue.pop().await {
                    process(record, &ctx, &stats).await;
                }
                tracing::debug!(worker = id, "worker stopped");
            })
        })
        .collect()
}

/// One record's trip through filter → format → deliver. Failures are logged
/// and counted; nothing here can take down the pool or the tailer.
async fn process(record: Record, ctx: &WorkerCtx, stats: &Stats) {
    if !ctx.filters.should_keep(&record) {
        stats.filtered.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(header = record.header(), "record filtered out");
        return;
    }

    let payload = Payload::build(&record, &ctx.notify, &ctx.source);
    match ctx.webhook.deliver(&payload).await {
        Ok(()) => {
            stats.delivered.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(header = record.header(), "record delivered");
        }
        Err(err) => {
            stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(error = %err, header = record.header(), "delivery failed");
        }
    }
}
