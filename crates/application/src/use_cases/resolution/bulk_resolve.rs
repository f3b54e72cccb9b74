use super::{run_worker, ResolveHostUseCase, WorkerStats};
use crate::ports::{LookupFactory, RecordSink};
use crate::services::WorkQueue;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub workers: usize,
    pub hosts: u64,
    pub emitted: u64,
    pub resolved_hosts: u64,
    pub failed_workers: usize,
}

impl RunSummary {
    fn add(&mut self, stats: WorkerStats) {
        self.hosts += stats.hosts;
        self.emitted += stats.emitted;
        self.resolved_hosts += stats.resolved;
    }
}

/// Fixed-size worker pool draining a [`WorkQueue`].
///
/// Every worker gets its own lookup client from the factory and writes its
/// records straight to the shared sink.
pub struct BulkResolveUseCase {
    factory: Arc<dyn LookupFactory>,
    sink: Arc<dyn RecordSink>,
    workers: usize,
    domain_only: bool,
}

impl BulkResolveUseCase {
    pub fn new(
        factory: Arc<dyn LookupFactory>,
        sink: Arc<dyn RecordSink>,
        workers: usize,
        domain_only: bool,
    ) -> Self {
        Self {
            factory,
            sink,
            workers: workers.max(1),
            domain_only,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs until the queue is closed and every worker has exited.
    pub async fn execute(&self, queue: WorkQueue) -> RunSummary {
        let mut join_set: JoinSet<WorkerStats> = JoinSet::new();

        for worker_id in 0..self.workers {
            let resolve = ResolveHostUseCase::new(self.factory.create(), self.domain_only);
            join_set.spawn(run_worker(
                worker_id,
                queue.clone(),
                resolve,
                self.sink.clone(),
            ));
        }
        drop(queue);

        info!(workers = self.workers, "Resolution workers started");

        let mut summary = RunSummary {
            workers: self.workers,
            ..Default::default()
        };

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok(stats) => summary.add(stats),
                Err(e) => {
                    error!(error = %e, "Resolution worker terminated abnormally");
                    summary.failed_workers += 1;
                }
            }
        }

        info!(
            hosts = summary.hosts,
            emitted = summary.emitted,
            resolved = summary.resolved_hosts,
            "Resolution run complete"
        );
        summary
    }
}
