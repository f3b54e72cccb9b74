use ferrous_rdns_application::services::WorkProducer;
use std::io::{self, BufRead};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Pushes every line of `reader` onto the work queue, in input order.
///
/// Line terminators (`\n` or `\r\n`) are stripped, nothing else is: blank
/// lines and surrounding whitespace are forwarded verbatim. Invalid UTF-8 is
/// replaced lossily. Returns the number of lines queued.
pub fn read_lines<R: BufRead>(mut reader: R, producer: &WorkProducer) -> io::Result<u64> {
    let mut buf = Vec::with_capacity(256);
    let mut queued = 0u64;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        let line = String::from_utf8_lossy(&buf).into_owned();
        if producer.push(line).is_err() {
            warn!(queued = queued, "Work queue closed before input was exhausted");
            break;
        }
        queued += 1;
    }

    debug!(lines = queued, "Input exhausted");
    Ok(queued)
}

/// Runs [`read_lines`] on the blocking pool. The producer is dropped when the
/// reader finishes, which closes the queue.
pub fn spawn_line_reader<R>(reader: R, producer: WorkProducer) -> JoinHandle<io::Result<u64>>
where
    R: BufRead + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let result = read_lines(reader, &producer);
        producer.close();
        result
    })
}
