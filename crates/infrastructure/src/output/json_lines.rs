use ferrous_rdns_application::ports::RecordSink;
use ferrous_rdns_domain::{DomainError, HostRecord};
use std::io::{self, Write};
use std::sync::Mutex;

/// Writes one compact JSON object per line.
///
/// The writer lock is held for the whole serialize-write-flush sequence,
/// so concurrent records never interleave.
pub struct JsonLineSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLineSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl JsonLineSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> RecordSink for JsonLineSink<W> {
    fn emit(&self, record: &HostRecord) -> Result<(), DomainError> {
        let mut line = serde_json::to_vec(record)
            .map_err(|e| DomainError::IoError(format!("Failed to serialize record: {}", e)))?;
        line.push(b'\n');

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| DomainError::IoError("Output writer poisoned".to_string()))?;
        writer
            .write_all(&line)
            .and_then(|_| writer.flush())
            .map_err(|e| DomainError::IoError(format!("Failed to write record: {}", e)))
    }
}
