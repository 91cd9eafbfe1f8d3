use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::record::DetectionRecord;

/// Errors that can occur during detection-log I/O.
#[derive(Debug, thiserror::Error)]
pub enum DetectionWriteError {
    #[error("failed to create parent directories: {0}")]
    CreateDir(std::io::Error),

    #[error("failed to open detection log file: {0}")]
    OpenFile(std::io::Error),

    #[error("failed to serialize detection record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write to detection log: {0}")]
    Write(std::io::Error),

    #[error("failed to flush detection log: {0}")]
    Flush(std::io::Error),
}

/// Append-only file writer that serialises [`DetectionRecord`] values as
/// JSON-lines.
///
/// Each call to [`write`](Self::write) produces exactly one
/// newline-terminated JSON object in the output file.
pub struct DetectionWriter {
    file: tokio::fs::File,
}

impl DetectionWriter {
    /// Open (or create) the detection log file at `path` in append mode.
    ///
    /// Parent directories are created automatically if they do not exist.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self, DetectionWriteError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(DetectionWriteError::CreateDir)?;
        }

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(DetectionWriteError::OpenFile)?;

        Ok(Self { file })
    }

    /// Serialise `record` as a single JSON line and append it to the file.
    pub async fn write(&mut self, record: &DetectionRecord) -> Result<(), DetectionWriteError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        self.file
            .write_all(&line)
            .await
            .map_err(DetectionWriteError::Write)?;

        Ok(())
    }

    /// Flush the underlying file, ensuring all buffered data reaches disk.
    pub async fn flush(&mut self) -> Result<(), DetectionWriteError> {
        self.file.flush().await.map_err(DetectionWriteError::Flush)
    }
}
