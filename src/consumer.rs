//! Consumer handle for dequeuing elements.
//!
//! Consumers compete for elements on a shared queue: each live element is
//! delivered to at most one successful poll across all handles. For
//! independent per-consumer positions, give each consumer its own queue.

use crate::queue::Queue;
use std::sync::Arc;

/// Dequeue-side handle over a shared [`Queue`].
///
/// Created by [`channel`](crate::channel), or attached to an existing
/// shared queue with [`Consumer::new`]. Handles are cheap to clone.
pub struct Consumer<T> {
    queue: Arc<Queue<T>>,
}

impl<T> Consumer<T> {
    /// Attach a consumer to an existing shared queue.
    pub fn new(queue: Arc<Queue<T>>) -> Self {
        Self { queue }
    }

    /// The underlying shared queue.
    pub fn queue(&self) -> &Queue<T> {
        &self.queue
    }

    /// Remove and return the element at the head of the shared queue.
    pub fn poll(&self) -> Option<T>
    where
        T: Clone,
    {
        self.queue.poll()
    }

    /// Return the head element without removing it.
    pub fn peek(&self) -> Option<T>
    where
        T: Clone,
    {
        self.queue.peek()
    }

    /// Poll up to `max` elements in one call.
    ///
    /// Stops early when the queue runs dry, so the returned batch may be
    /// shorter than `max` (or empty).
    pub fn poll_batch(&self, max: usize) -> Vec<T>
    where
        T: Clone,
    {
        let mut batch = Vec::with_capacity(max);
        for _ in 0..max {
            match self.queue.poll() {
                Some(value) => batch.push(value),
                None => break,
            }
        }
        batch
    }

    /// `true` if the shared queue has no live elements.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T> Clone for Consumer<T> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
        }
    }
}
