//! Weakly-consistent iterator over the queue's live elements.
//!
//! The iterator is guaranteed to traverse the elements that existed when
//! it was constructed, may (but need not) reflect later concurrent
//! changes, and never fails with a concurrent-modification error. It
//! buffers one element ahead: once an element has been promised by the
//! cursor it is returned by the following `next` call even if another
//! thread removes it in the meantime.

use crate::error::{QueueError, QueueResult};
use crate::node::Node;
use crate::queue::Queue;
use crossbeam_epoch::{self as epoch, Guard, Shared};
use std::ptr;

/// Cursor over a [`Queue`], created by [`Queue::iter`].
///
/// Besides the standard [`Iterator`] surface, the cursor supports lazy
/// removal of the last returned element via [`Iter::remove`].
///
/// # Example
///
/// ```rust
/// use linkq::Queue;
///
/// let queue: Queue<i32> = (1..=3).collect();
///
/// let mut iter = queue.iter();
/// assert_eq!(iter.next(), Some(1));
/// iter.remove().unwrap();
///
/// assert_eq!(queue.to_vec(), vec![2, 3]);
/// ```
pub struct Iter<'a, T> {
    queue: &'a Queue<T>,
    /// Pin held for the iterator's whole lifetime. Every node this cursor
    /// has loaded stays out of the collector until the cursor is dropped,
    /// which is what keeps the raw node pointers below valid.
    guard: Guard,
    /// Node whose element is buffered in `next_item`; null once exhausted.
    next_node: *const Node<T>,
    /// One-ahead buffer holding the promised element.
    next_item: Option<T>,
    /// Node of the last returned element, to support `remove`.
    last_returned: *const Node<T>,
}

impl<'a, T: Clone> Iter<'a, T> {
    pub(crate) fn new(queue: &'a Queue<T>) -> Self {
        let mut iter = Self {
            queue,
            guard: epoch::pin(),
            next_node: ptr::null(),
            next_item: None,
            last_returned: ptr::null(),
        };
        // Position on the first live element (or go straight to
        // exhaustion); the discarded return value is the empty
        // pre-construction buffer.
        iter.advance();
        iter
    }

    /// Move to the next live node, returning the previously buffered
    /// element and re-filling the buffer one step ahead.
    fn advance(&mut self) -> Option<T> {
        let Self {
            queue,
            guard,
            next_node,
            next_item,
            last_returned,
        } = self;

        *last_returned = *next_node;
        let promised = next_item.take();

        let mut cursor: Shared<'_, Node<T>> = if next_node.is_null() {
            queue.first(guard)
        } else {
            // Re-scan from the successor of the node we last buffered,
            // skipping slots emptied since.
            unsafe { &**next_node }.next(guard)
        };
        loop {
            match unsafe { cursor.as_ref() } {
                None => {
                    *next_node = ptr::null();
                    return promised;
                }
                Some(node) => {
                    if let Some(item) = unsafe { node.item(guard).as_ref() } {
                        *next_item = Some(item.clone());
                        *next_node = cursor.as_raw();
                        return promised;
                    }
                    cursor = node.next(guard);
                }
            }
        }
    }
}

impl<T> Iter<'_, T> {
    /// Lazily remove the element most recently returned by `next`.
    ///
    /// The node's slot is emptied in place; physical unlinking is left to
    /// a future traversal. If a concurrent operation already emptied the
    /// slot, the removal is a harmless no-op.
    ///
    /// # Errors
    ///
    /// [`QueueError::IteratorState`] if no element has been returned yet,
    /// or if `remove` is called twice without an intervening `next`.
    pub fn remove(&mut self) -> QueueResult<()> {
        if self.last_returned.is_null() {
            return Err(QueueError::IteratorState);
        }
        let guard = &self.guard;
        let node = unsafe { &*self.last_returned };
        let item = node.item(guard);
        if !item.is_null() && node.clear_item(item, guard) {
            unsafe { guard.defer_destroy(item) };
        }
        self.last_returned = ptr::null();
        Ok(())
    }
}

impl<T: Clone> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next_node.is_null() {
            // Exhausted; there is no buffered element to deliver.
            return None;
        }
        self.advance()
    }
}

#[cfg(test)]
mod tests {
    use crate::queue::Queue;

    #[test]
    fn iterates_in_fifo_order() {
        let queue: Queue<i32> = (1..=4).collect();
        let collected: Vec<i32> = queue.iter().collect();
        assert_eq!(collected, vec![1, 2, 3, 4]);
    }

    #[test]
    fn empty_queue_iterator_is_exhausted() {
        let queue: Queue<i32> = Queue::new();
        let mut iter = queue.iter();
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }
}
