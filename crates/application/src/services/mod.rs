pub mod work_queue;

pub use work_queue::{work_queue, WorkProducer, WorkQueue};
