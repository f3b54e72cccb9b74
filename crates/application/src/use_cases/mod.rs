pub mod resolution;

// Re-export use cases
pub use resolution::{
    run_worker, BulkResolveUseCase, ResolveHostUseCase, RunSummary, WorkerStats,
};
