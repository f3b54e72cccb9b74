use ferrous_rdns_application::ports::RecordSink;
use ferrous_rdns_domain::{DomainError, HostRecord};
use std::sync::Mutex;

#[derive(Default)]
pub struct CollectingSink {
    records: Mutex<Vec<HostRecord>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<HostRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Records sorted by host, for comparisons that ignore output order.
    pub fn sorted_records(&self) -> Vec<HostRecord> {
        let mut records = self.records();
        records.sort_by(|a, b| a.host.cmp(&b.host));
        records
    }
}

impl RecordSink for CollectingSink {
    fn emit(&self, record: &HostRecord) -> Result<(), DomainError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub struct FailingSink;

impl RecordSink for FailingSink {
    fn emit(&self, _record: &HostRecord) -> Result<(), DomainError> {
        Err(DomainError::IoError("broken pipe".to_string()))
    }
}
