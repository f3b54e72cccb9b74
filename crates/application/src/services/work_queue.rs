use ferrous_rdns_domain::DomainError;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Creates an unbounded single-producer, multi-consumer hand-off of hostnames.
pub fn work_queue() -> (WorkProducer, WorkQueue) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let producer = WorkProducer { sender };
    let queue = WorkQueue {
        receiver: Arc::new(Mutex::new(receiver)),
    };
    (producer, queue)
}

/// Producer side. Dropping it (or calling [`WorkProducer::close`]) closes the
/// queue; consumers still drain whatever was already pushed.
#[derive(Debug)]
pub struct WorkProducer {
    sender: mpsc::UnboundedSender<String>,
}

impl WorkProducer {
    pub fn push(&self, host: String) -> Result<(), DomainError> {
        self.sender.send(host).map_err(|_| DomainError::QueueClosed)
    }

    pub fn close(self) {
        drop(self.sender);
    }
}

/// Consumer side. Clones share the same underlying receiver, so every item is
/// handed to exactly one consumer.
#[derive(Debug, Clone)]
pub struct WorkQueue {
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<String>>>,
}

impl WorkQueue {
    /// Next hostname, or `None` once the producer is gone and the queue is drained.
    pub async fn next(&self) -> Option<String> {
        self.receiver.lock().await.recv().await
    }
}
