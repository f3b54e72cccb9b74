use super::ResolveHostUseCase;
use crate::ports::RecordSink;
use crate::services::WorkQueue;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    /// Hostnames taken from the queue
    pub hosts: u64,
    /// Records accepted by the sink
    pub emitted: u64,
    /// Records with at least one address
    pub resolved: u64,
}

/// Drains `queue` until it is closed and empty, emitting one record per hostname.
pub async fn run_worker(
    worker_id: usize,
    queue: WorkQueue,
    resolve: ResolveHostUseCase,
    sink: Arc<dyn RecordSink>,
) -> WorkerStats {
    let mut stats = WorkerStats::default();

    while let Some(host) = queue.next().await {
        stats.hosts += 1;

        let record = resolve.execute(&host).await;
        if record.is_resolved() {
            stats.resolved += 1;
        }

        match sink.emit(&record) {
            Ok(()) => stats.emitted += 1,
            Err(e) => warn!(worker = worker_id, host = %host, error = %e, "Failed to emit record"),
        }
    }

    debug!(
        worker = worker_id,
        hosts = stats.hosts,
        emitted = stats.emitted,
        "Worker finished"
    );
    stats
}
