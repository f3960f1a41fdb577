//! Snapshot codec: stream-based persistence for queue contents.
//!
//! The external representation is a sequence of element records in FIFO
//! order followed by a single end-of-sequence sentinel record. Each record
//! is one JSON value per line: an element encodes as its plain JSON, the
//! sentinel as `null`. Element types whose own encoding is `null` (for
//! example an `Option` that can be `None`) are therefore not supported by
//! this codec.
//!
//! This is a convenience bridge, not a transactional checkpoint: writing
//! traverses a live snapshot, so concurrent mutation yields a valid
//! subset/superset of the content at some instant. Reading reconstructs a
//! fresh queue by offering each record until the sentinel is observed.

use crate::error::{QueueError, QueueResult};
use crate::queue::Queue;
use crossbeam_epoch as epoch;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{BufRead, Write};

/// Write the queue's live elements to `writer` in FIFO order, terminated
/// by the end-of-sequence sentinel. Returns the number of element records
/// written.
///
/// # Example
///
/// ```rust
/// use linkq::{snapshot, Queue};
///
/// let queue: Queue<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
///
/// let mut buffer = Vec::new();
/// snapshot::write(&queue, &mut buffer).unwrap();
///
/// let restored: Queue<String> = snapshot::read(buffer.as_slice()).unwrap();
/// assert_eq!(restored.to_vec(), queue.to_vec());
/// ```
pub fn write<T, W>(queue: &Queue<T>, mut writer: W) -> QueueResult<usize>
where
    T: Serialize,
    W: Write,
{
    let guard = &epoch::pin();
    let mut written = 0usize;
    let mut cursor = queue.first(guard);
    while let Some(node) = unsafe { cursor.as_ref() } {
        if let Some(item) = unsafe { node.item(guard).as_ref() } {
            serde_json::to_writer(&mut writer, &Some(item))?;
            writer.write_all(b"\n")?;
            written += 1;
        }
        cursor = node.next(guard);
    }
    serde_json::to_writer(&mut writer, &Option::<&T>::None)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    log::debug!("snapshot wrote {} element records", written);
    Ok(written)
}

/// Reconstruct a queue from a record stream produced by [`write`].
///
/// Elements are offered in the order read, so the restored queue polls in
/// the same order the source queue would have.
///
/// # Errors
///
/// - [`QueueError::Io`] if the stream cannot be read.
/// - [`QueueError::Record`] if a record cannot be decoded.
/// - [`QueueError::SnapshotTruncated`] if the stream ends before the
///   end-of-sequence sentinel.
pub fn read<T, R>(reader: R) -> QueueResult<Queue<T>>
where
    T: DeserializeOwned,
    R: BufRead,
{
    let queue = Queue::new();
    let mut restored = 0usize;
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Option<T>>(&line)? {
            Some(value) => {
                queue.offer(value);
                restored += 1;
            }
            None => {
                log::debug!("snapshot restored {} element records", restored);
                return Ok(queue);
            }
        }
    }
    Err(QueueError::SnapshotTruncated)
}
