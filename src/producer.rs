//! Producer handle for enqueuing elements.
//!
//! Producers push elements onto a shared queue. Each handle is a thin,
//! cloneable wrapper, so any number of threads can hold their own
//! producer over the same queue.

use crate::queue::Queue;
use std::sync::Arc;

/// Enqueue-side handle over a shared [`Queue`].
///
/// Created by [`channel`](crate::channel), or attached to an existing
/// shared queue with [`Producer::new`].
///
/// # Example
///
/// ```rust
/// use std::thread;
///
/// let (producer, consumer) = linkq::channel();
///
/// let workers: Vec<_> = (0..4)
///     .map(|worker| {
///         let producer = producer.clone();
///         thread::spawn(move || producer.offer(worker))
///     })
///     .collect();
/// for worker in workers {
///     worker.join().unwrap();
/// }
///
/// assert_eq!(consumer.poll_batch(10).len(), 4);
/// ```
pub struct Producer<T> {
    queue: Arc<Queue<T>>,
}

impl<T> Producer<T> {
    /// Attach a producer to an existing shared queue.
    pub fn new(queue: Arc<Queue<T>>) -> Self {
        Self { queue }
    }

    /// The underlying shared queue.
    pub fn queue(&self) -> &Queue<T> {
        &self.queue
    }

    /// Insert `value` at the tail of the shared queue. Always `true`.
    pub fn offer(&self, value: T) -> bool {
        self.queue.offer(value)
    }
}

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
        }
    }
}
