//! Lock-Free Unbounded MPMC Queue
//!
//! A reusable FIFO queue for concurrent producers and consumers, based on
//! the Michael & Scott non-blocking queue algorithm with support for lazy
//! removal of interior elements.
//!
//! # Overview
//!
//! This crate provides a linked queue that enables communication between
//! threads without locks. Key features include:
//!
//! - **Multiple Producers**: Any number of threads can enqueue concurrently
//! - **Multiple Consumers**: Any number of threads can dequeue concurrently
//! - **Lock-Free Progress**: Some thread always completes its operation in
//!   a bounded number of steps; no operation ever blocks another thread
//! - **Lazy Removal**: Interior elements can be removed by value or through
//!   the iterator; the slot is emptied in place and the node unlinked later
//! - **Weakly-Consistent Iteration**: Iterators never observe a
//!   concurrent-modification failure
//! - **Snapshot Persistence**: Queue contents can be written to and
//!   restored from any sequential byte stream
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  Producer A  │     │  Producer B  │     │  Producer C  │
//! └──────┬───────┘     └──────┬───────┘     └──────┬───────┘
//!        │ offer              │ offer              │ offer
//!        ▼                    ▼                    ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                       Queue<T>                          │
//! │   head ──► [dummy] ─► [ 1 ] ─► [ 2 ] ─► [ 3 ] ◄── tail  │
//! └─────────────────────────────────────────────────────────┘
//!        │ poll               │ poll               │ poll
//! ┌──────┴───────┐     ┌──────┴───────┐     ┌──────┴───────┐
//! │  Consumer X  │     │  Consumer Y  │     │  Consumer Z  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! New elements are linked at the tail; retrieval operations work at the
//! head. The head node is a dummy: the first real element, if any, lives
//! in its successor. Memory is reclaimed through epoch-based reclamation,
//! so a node is only freed once no thread can still hold a reference
//! into it.
//!
//! # Example
//!
//! ```rust
//! use linkq::Queue;
//!
//! let queue = Queue::new();
//! queue.offer(1);
//! queue.offer(2);
//! queue.offer(3);
//!
//! assert_eq!(queue.len(), 3);
//! assert_eq!(queue.poll(), Some(1));
//! assert_eq!(queue.peek(), Some(2));
//! assert!(queue.remove(&3));
//! assert_eq!(queue.poll(), Some(2));
//! assert!(queue.is_empty());
//! ```

mod consumer;
mod error;
mod iter;
mod node;
mod producer;
mod queue;
pub mod snapshot;

pub use consumer::Consumer;
pub use error::{QueueError, QueueResult};
pub use iter::Iter;
pub use producer::Producer;
pub use queue::Queue;

use std::sync::Arc;

/// Create a connected producer/consumer handle pair over a fresh queue.
///
/// Both handles are cheap to clone, so any number of producers and
/// consumers can share the same queue. The queue itself is dropped once
/// the last handle goes away.
///
/// # Example
///
/// ```rust
/// let (producer, consumer) = linkq::channel();
///
/// producer.offer("job");
/// assert_eq!(consumer.poll(), Some("job"));
/// ```
pub fn channel<T>() -> (Producer<T>, Consumer<T>) {
    let queue = Arc::new(Queue::new());
    log::trace!("queue handle pair created");
    (Producer::new(Arc::clone(&queue)), Consumer::new(queue))
}

#[cfg(test)]
mod tests;
