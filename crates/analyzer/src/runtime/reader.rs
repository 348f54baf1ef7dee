//! Reader — async line producer feeding the analysis session.
//!
//! One task reads the input and pushes raw lines into a bounded channel;
//! the single consumer owns the session. Invalid UTF-8 is decoded lossily
//! so a damaged byte never stops the run.

use futures_util::Stream;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawn the producer task. It resolves to the number of lines sent.
pub fn spawn_line_reader<R>(
    reader: R,
    capacity: usize,
) -> (mpsc::Receiver<String>, JoinHandle<std::io::Result<u64>>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<String>(capacity);

    let handle = tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut sent = 0u64;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            if buf.last() == Some(&b'\n') {
                buf.pop();
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.to_string(),
                Err(_) => {
                    warn!(line = sent + 1, "invalid UTF-8 in input, decoding lossily");
                    String::from_utf8_lossy(&buf).into_owned()
                }
            };

            if tx.send(line).await.is_err() {
                debug!("line consumer dropped, stopping reader");
                break;
            }
            sent += 1;
        }

        Ok(sent)
    });

    (rx, handle)
}

/// Adapt the receiving end into a stream of lines.
pub fn line_stream(mut rx: mpsc::Receiver<String>) -> impl Stream<Item = String> {
    async_stream::stream! {
        while let Some(line) = rx.recv().await {
            yield line;
        }
    }
}
