pub mod bulk_resolve;
pub mod resolve_host;
pub mod worker;

pub use bulk_resolve::{BulkResolveUseCase, RunSummary};
pub use resolve_host::ResolveHostUseCase;
pub use worker::{run_worker, WorkerStats};
