//! Stream pumps: one task per scanner output stream.
//!
//! A pump reads its stream line by line, classifies each line and forwards the
//! resulting events to the shared bounded channel. Sending awaits channel
//! capacity, so a slow renderer slows both pumps instead of losing events.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::sync::mpsc::Sender;
use tracing::{debug, warn};

use crate::classify::classify;
use crate::error::PumpError;
use crate::events::{Event, StreamKind};

/// Longest line accepted from the scanner, excluding the line terminator.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Counters returned by a finished pump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub lines_read: usize,
    pub events_sent: usize,
}

/// Reads `\n`-terminated lines, bounded by a maximum length.
///
/// A trailing `\r` is stripped and invalid UTF-8 is replaced lossily, so a
/// single bad byte never ends the stream.
pub struct LineReader<R> {
    inner: R,
    stream: StreamKind,
    limit: usize,
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(inner: R, stream: StreamKind) -> Self {
        Self::with_limit(inner, stream, MAX_LINE_BYTES)
    }

    pub fn with_limit(inner: R, stream: StreamKind, limit: usize) -> Self {
        Self {
            inner,
            stream,
            limit,
            buf: Vec::new(),
        }
    }

    /// Read the next line, or `None` at end of stream.
    pub async fn next_line(&mut self) -> Result<Option<String>, PumpError> {
        self.buf.clear();
        let read = (&mut self.inner)
            .take(self.limit as u64 + 1)
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(|source| PumpError::Read {
                stream: self.stream,
                source,
            })?;

        if read == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        } else if self.buf.len() > self.limit {
            return Err(PumpError::LineTooLong {
                stream: self.stream,
                limit: self.limit,
            });
        }

        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

/// Pump one stream to completion.
///
/// Every line yields zero or one event on `events`. A read failure is shown
/// as an error line and then treated as end of stream. Exactly one completion
/// signal is sent on `done` before returning, whatever the outcome.
pub async fn pump<R>(
    reader: R,
    stream: StreamKind,
    events: Sender<Event>,
    done: Sender<StreamKind>,
) -> PumpStats
where
    R: AsyncRead + Unpin,
{
    debug!(%stream, "stream pump started");

    let mut lines = LineReader::new(BufReader::new(reader), stream);
    let mut stats = PumpStats::default();
    // Once the renderer is gone we keep draining so the scanner never blocks
    // on a full pipe.
    let mut renderer_alive = true;

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                stats.lines_read += 1;
                let Some(event) = classify(&line, stream) else {
                    continue;
                };
                if renderer_alive {
                    if events.send(event).await.is_ok() {
                        stats.events_sent += 1;
                    } else {
                        debug!(%stream, "renderer closed; discarding remaining events");
                        renderer_alive = false;
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(%stream, error = %e, "stream read failed");
                if renderer_alive && events.send(Event::error_line(e.to_string())).await.is_ok() {
                    stats.events_sent += 1;
                }
                break;
            }
        }
    }

    drop(events);
    debug!(
        %stream,
        lines = stats.lines_read,
        events = stats.events_sent,
        "stream pump finished"
    );

    // The orchestrator only stops listening after receiving both signals.
    let _ = done.send(stream).await;
    stats
}
