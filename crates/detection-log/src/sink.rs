use std::path::Path;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::record::DetectionRecord;
use crate::writer::DetectionWriter;

/// Channel buffer size between producers and the background writer task.
const CHANNEL_BUFFER: usize = 1024;

/// Flush the writer at most every this many seconds when the channel is idle.
const FLUSH_INTERVAL_SECS: u64 = 1;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Receiver for detection records.
///
/// Implementations must be non-blocking: the sanitizer calls
/// [`record`](Self::record) from inside a synchronous text-transform path and
/// the transform's result must not depend on the sink in any way. A sink that
/// cannot accept a record drops it.
pub trait DetectionSink: Send + Sync {
    fn record(&self, record: DetectionRecord);
}

// ---------------------------------------------------------------------------
// TracingSink
// ---------------------------------------------------------------------------

/// A sink that logs every record through `tracing` and writes nothing.
///
/// Useful as a default in tests and in deployments where the process-wide
/// subscriber already ships logs somewhere durable.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DetectionSink for TracingSink {
    fn record(&self, record: DetectionRecord) {
        tracing::warn!(
            pattern = %record.pattern,
            category = %record.category,
            component = %record.component,
            "detection recorded"
        );
    }
}

// ---------------------------------------------------------------------------
// JsonlSink
// ---------------------------------------------------------------------------

/// A cheap, cloneable handle that submits [`DetectionRecord`] values into a
/// background JSON-lines writer.
///
/// `JsonlSink` is `Clone + Send + Sync` so it can be shared freely across
/// components and tasks.
#[derive(Clone)]
pub struct JsonlSink {
    tx: mpsc::Sender<DetectionRecord>,
}

impl JsonlSink {
    /// Spawn the background writer task and return a `(sink, join_handle)`
    /// pair.
    ///
    /// The writer opens (or creates) the file at `path` in append mode and
    /// begins draining records from the internal channel. The background task
    /// will:
    ///
    /// * Write each record as a JSON line via [`DetectionWriter`].
    /// * Flush periodically (every ~1 second of channel inactivity).
    /// * Flush once more when the last `JsonlSink` clone is dropped and the
    ///   channel closes, then exit cleanly.
    ///
    /// The background task never panics; I/O errors are logged via
    /// `tracing::error` and the record is skipped.
    pub async fn start(
        path: impl AsRef<Path>,
    ) -> Result<(Self, JoinHandle<()>), crate::writer::DetectionWriteError> {
        let (tx, rx) = mpsc::channel::<DetectionRecord>(CHANNEL_BUFFER);

        let mut writer = DetectionWriter::new(path).await?;

        let handle = tokio::spawn(async move {
            run_writer_loop(&mut writer, rx).await;
        });

        Ok((Self { tx }, handle))
    }
}

impl DetectionSink for JsonlSink {
    /// Submit a record without blocking.
    ///
    /// If the channel is full, or the background task has already exited, the
    /// record is dropped and a warning is logged; the caller is unaffected.
    fn record(&self, record: DetectionRecord) {
        if let Err(err) = self.tx.try_send(record) {
            let dropped = match &err {
                mpsc::error::TrySendError::Full(r) => r,
                mpsc::error::TrySendError::Closed(r) => r,
            };
            tracing::warn!(
                pattern = %dropped.pattern,
                category = %dropped.category,
                "detection sink unavailable — record dropped"
            );
        }
    }
}

/// Core loop executed inside the background task.
///
/// Reads records from the channel and writes them to the log. When the
/// channel has no records ready for [`FLUSH_INTERVAL_SECS`] the writer is
/// flushed. On channel close a final flush is performed.
async fn run_writer_loop(writer: &mut DetectionWriter, mut rx: mpsc::Receiver<DetectionRecord>) {
    let flush_interval = tokio::time::Duration::from_secs(FLUSH_INTERVAL_SECS);
    let mut dirty = false;

    loop {
        // Wait for the next record, but time out so we can periodically flush.
        let maybe_record = tokio::time::timeout(flush_interval, rx.recv()).await;

        match maybe_record {
            // Received a record before the timeout.
            Ok(Some(record)) => {
                if let Err(err) = writer.write(&record).await {
                    tracing::error!(%err, "failed to write detection record");
                } else {
                    dirty = true;
                }
            }
            // Channel closed — perform final flush and exit.
            Ok(None) => {
                if dirty {
                    if let Err(err) = writer.flush().await {
                        tracing::error!(%err, "failed to flush detection log on shutdown");
                    }
                }
                tracing::debug!("detection writer background task shutting down");
                return;
            }
            // Timeout — flush if we have outstanding writes.
            Err(_) => {
                if dirty {
                    if let Err(err) = writer.flush().await {
                        tracing::error!(%err, "periodic detection log flush failed");
                    } else {
                        dirty = false;
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
