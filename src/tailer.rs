//! The stream-owning task: read chunks, segment, hand records to the queue.
//!
//! Exactly one tailer runs per process. Segmentation is strictly sequential
//! here; everything downstream of the queue runs concurrently. A record
//! hand-off can wait on the queue (block policy), which is the intended
//! backpressure path, but no worker failure can reach this loop.

use crate::pool::{RecordQueue, Stats};
use snitch_core::Segmenter;
use std::future::Future;
use std::sync::atomic::Ordering;
use tokio::io::{AsyncRead, AsyncReadExt};

const CHUNK_SIZE: usize = 8192;

/// Read `reader` until end of stream or until `stop` resolves, feeding
/// every chunk through the segmenter and queueing each complete record.
/// Both exits flush the segmenter tail, so bytes buffered behind an
/// interrupted read still become a record. The queue is left open; the
/// caller closes it once no more streams will be tailed.
pub async fn run<R, S>(
    mut reader: R,
    mut segmenter: Segmenter,
    queue: &RecordQueue,
    stats: &Stats,
    stop: S,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    S: Future<Output = ()>,
{
    tokio::pin!(stop);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let n = tokio::select! {
            read = reader.read(&mut chunk) => read?,
            _ = &mut stop => {
                tracing::debug!("stream reader stopped");
                break;
            }
        };
        if n == 0 {
            break;
        }
        segmenter.push(&chunk[..n]);
        while let Some(record) = segmenter.next_record() {
            stats.segmented.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(lines = record.line_count(), "record segmented");
            queue.push(record).await;
        }
    }
    if let Some(record) = segmenter.finish() {
        stats.segmented.fetch_add(1, Ordering::Relaxed);
        queue.push(record).await;
    }
    tracing::debug!("stream ended");
    Ok(())
}
