use ferrous_rdns_domain::{DomainError, HostRecord};

/// Destination for finished records. Each `emit` must write the record as one
/// unit, never interleaved with a concurrent `emit`.
pub trait RecordSink: Send + Sync {
    fn emit(&self, record: &HostRecord) -> Result<(), DomainError>;
}
