mod host_lookup;
mod record_sink;

pub use host_lookup::{HostLookup, LookupFactory};
pub use record_sink::RecordSink;
