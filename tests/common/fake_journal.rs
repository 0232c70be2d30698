//! FakeJournal — a scripted byte stream standing in for `journalctl` output.
//!
//! Built on a channel of [`Bytes`] chunks bridged into an [`AsyncRead`] with
//! `tokio_util::io::StreamReader`, which hands each chunk to the consumer as
//! its own read. Chunk timing is the lever the segmenter's premature flush
//! keys off, so harnesses get to control it exactly.
//!
//! [`AsyncRead`]: tokio::io::AsyncRead

use bytes::Bytes;
use futures::Stream;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_util::io::StreamReader;

/// A handle for pushing journal output into a [`FakeJournal`] stream.
pub struct FakeJournalWriter {
    tx: mpsc::UnboundedSender<io::Result<Bytes>>,
}

impl FakeJournalWriter {
    /// Send one line as one chunk. Adds a trailing newline if not already
    /// present.
    pub fn send_line(&self, line: impl Into<String>) {
        let mut s = line.into();
        if !s.ends_with('\n') {
            s.push('\n');
        }
        let _ = self.tx.send(Ok(Bytes::from(s)));
    }

    /// Send exact bytes as one chunk. No newline handling; use this to place
    /// a chunk boundary mid-record.
    pub fn send_raw(&self, bytes: impl Into<Bytes>) {
        let _ = self.tx.send(Ok(bytes.into()));
    }

    /// Send a whole record as one chunk: a header line followed by
    /// space-indented continuation lines.
    pub fn send_record(&self, header: &str, continuations: &[&str]) {
        let mut s = String::with_capacity(header.len() + 16);
        s.push_str(header);
        s.push('\n');
        for line in continuations {
            s.push(' ');
            s.push_str(line);
            s.push('\n');
        }
        let _ = self.tx.send(Ok(Bytes::from(s)));
    }

    /// Send multiple single-line records, one chunk each.
    pub fn send_burst(&self, lines: &[&str]) {
        for line in lines {
            self.send_line(*line);
        }
    }

    /// Close the stream, causing the consumer to see EOF.
    pub fn close(self) {
        // tx is dropped, causing the channel to close.
    }
}

/// The read side of a scripted journal stream.
pub struct FakeJournal {
    rx: mpsc::UnboundedReceiver<io::Result<Bytes>>,
}

impl FakeJournal {
    /// Bridge into an `AsyncRead` for code that tails a byte stream.
    pub fn reader(self) -> StreamReader<FakeJournal, Bytes> {
        StreamReader::new(self)
    }
}

impl Stream for FakeJournal {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Create a linked writer/stream pair.
///
/// ```rust
/// let (journal, stream) = fake_journal();
/// journal.send_record("ERROR boom", &["at handler.rs:42"]);
/// journal.close();
/// // Feed `stream.reader()` to the code under test.
/// ```
pub fn fake_journal() -> (FakeJournalWriter, FakeJournal) {
    let (tx, rx) = mpsc::unbounded_channel();
    (FakeJournalWriter { tx }, FakeJournal { rx })
}
