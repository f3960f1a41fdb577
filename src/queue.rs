//! Core lock-free queue implementation.
//!
//! This module provides the Michael & Scott non-blocking queue with one
//! algorithmic addition: interior nodes can be lazily deleted by emptying
//! their element slot in place. Normal queue operations unlink nodes at
//! the head but simply pass over interior nodes with empty slots, and
//! traversal-based operations ignore them.
//!
//! All structural mutation happens through single-word compare-and-swap on
//! `head`, `tail`, and the per-node fields. `tail` is advisory: it may lag
//! the true last node by one link, and every operation that notices the
//! lag helps swing it forward before retrying. Unlinked nodes and removed
//! elements are retired through epoch-based reclamation rather than freed
//! in place, so concurrent readers pinned in the same epoch never touch
//! freed memory.

use crate::iter::Iter;
use crate::node::Node;
use crossbeam_epoch::{self as epoch, Atomic, Guard, Owned, Shared};
use crossbeam_utils::CachePadded;
use std::fmt;
use std::sync::atomic::Ordering;

/// An unbounded, lock-free, multi-producer/multi-consumer FIFO queue.
///
/// Elements are enqueued at the tail and dequeued at the head. The head
/// of the queue is the element that has been on it the longest; ordering
/// is first-in-first-out per producing thread.
///
/// Beware that, unlike most collections, [`Queue::len`] is *not* a
/// constant-time operation: determining the number of live elements
/// requires a traversal.
///
/// # Thread Safety
///
/// All operations take `&self` and are safe to call from any number of
/// threads concurrently. An element accepted by [`Queue::offer`] becomes
/// visible to dequeuers only once its node is linked, and a successful
/// [`Queue::poll`] establishes a happens-before edge from the enqueuing
/// thread's prior actions to the dequeuing thread's subsequent ones.
///
/// # Example
///
/// ```rust
/// use linkq::Queue;
/// use std::sync::Arc;
/// use std::thread;
///
/// let queue = Arc::new(Queue::new());
///
/// let producer = {
///     let queue = Arc::clone(&queue);
///     thread::spawn(move || {
///         for i in 0..100 {
///             queue.offer(i);
///         }
///     })
/// };
///
/// producer.join().unwrap();
/// assert_eq!(queue.len(), 100);
/// assert_eq!(queue.poll(), Some(0));
/// ```
pub struct Queue<T> {
    /// Current dummy node; the first real element is in its successor.
    head: CachePadded<Atomic<Node<T>>>,
    /// Last node, or transiently one link behind it.
    tail: CachePadded<Atomic<Node<T>>>,
}

impl<T> Queue<T> {
    /// Create an empty queue.
    ///
    /// Both `head` and `tail` start out pointing at a permanent dummy
    /// node so that neither is ever null.
    pub fn new() -> Self {
        // The dummy is shared by head and tail until the first offer.
        let sentinel = Owned::new(Node::sentinel());
        unsafe {
            let sentinel = sentinel.into_shared(epoch::unprotected());
            Self {
                head: CachePadded::new(Atomic::from(sentinel)),
                tail: CachePadded::new(Atomic::from(sentinel)),
            }
        }
    }

    /// Insert `value` at the tail of the queue.
    ///
    /// Always returns `true`: the queue is unbounded, so acceptance never
    /// fails. Lock-free; contention causes internal retries only.
    pub fn offer(&self, value: T) -> bool {
        let guard = &epoch::pin();
        let mut node = Owned::new(Node::data(value));
        loop {
            let tail = self.tail.load(Ordering::Acquire, guard);
            let tail_ref = unsafe { tail.deref() };
            let next = tail_ref.next(guard);
            if tail != self.tail.load(Ordering::Acquire, guard) {
                // A concurrent tail swing invalidated this snapshot.
                continue;
            }
            if next.is_null() {
                match tail_ref.link_next(node, guard) {
                    Ok(linked) => {
                        // Best-effort swing; a failure means another
                        // thread already completed it.
                        let _ = self.tail.compare_exchange(
                            tail,
                            linked,
                            Ordering::Release,
                            Ordering::Relaxed,
                            guard,
                        );
                        return true;
                    }
                    Err(returned) => node = returned,
                }
            } else {
                // Tail lags behind a linked node: help swing it forward.
                let _ = self.tail.compare_exchange(
                    tail,
                    next,
                    Ordering::Release,
                    Ordering::Relaxed,
                    guard,
                );
            }
        }
    }

    /// Insert `value` at the tail of the queue. Alias for [`Queue::offer`].
    pub fn add(&self, value: T) -> bool {
        self.offer(value)
    }

    /// Remove and return the element at the head of the queue, or `None`
    /// if no live element exists.
    pub fn poll(&self) -> Option<T>
    where
        T: Clone,
    {
        let guard = &epoch::pin();
        loop {
            let head = self.head.load(Ordering::Acquire, guard);
            let tail = self.tail.load(Ordering::Acquire, guard);
            let first = unsafe { head.deref() }.next(guard);
            if head != self.head.load(Ordering::Acquire, guard) {
                continue;
            }
            if head == tail {
                if first.is_null() {
                    return None;
                }
                // Lagging tail: help it past the dummy, then retry.
                let _ = self.tail.compare_exchange(
                    tail,
                    first,
                    Ordering::Release,
                    Ordering::Relaxed,
                    guard,
                );
                continue;
            }
            // head != tail, so a successor exists.
            if self
                .head
                .compare_exchange(head, first, Ordering::Release, Ordering::Relaxed, guard)
                .is_ok()
            {
                // The old dummy is now unreachable from the queue.
                unsafe { guard.defer_destroy(head) };
                let first_ref = unsafe { first.deref() };
                let item = first_ref.item(guard);
                if !item.is_null() && first_ref.clear_item(item, guard) {
                    let value = unsafe { item.deref() }.clone();
                    unsafe { guard.defer_destroy(item) };
                    return Some(value);
                }
                // A concurrent dequeue or removal emptied the slot after
                // our head swing; the dead node is the new dummy. Retry.
            }
        }
    }

    /// Return the element at the head of the queue without removing it,
    /// or `None` if no live element exists.
    ///
    /// Skipping over already-emptied nodes advances `head` past them;
    /// shedding that dead weight is peek's one side effect.
    pub fn peek(&self) -> Option<T>
    where
        T: Clone,
    {
        let guard = &epoch::pin();
        loop {
            let head = self.head.load(Ordering::Acquire, guard);
            let tail = self.tail.load(Ordering::Acquire, guard);
            let first = unsafe { head.deref() }.next(guard);
            if head != self.head.load(Ordering::Acquire, guard) {
                continue;
            }
            if head == tail {
                if first.is_null() {
                    return None;
                }
                let _ = self.tail.compare_exchange(
                    tail,
                    first,
                    Ordering::Release,
                    Ordering::Relaxed,
                    guard,
                );
                continue;
            }
            let first_ref = unsafe { first.deref() };
            if let Some(value) = unsafe { first_ref.item(guard).as_ref() } {
                return Some(value.clone());
            }
            if self
                .head
                .compare_exchange(head, first, Ordering::Release, Ordering::Relaxed, guard)
                .is_ok()
            {
                unsafe { guard.defer_destroy(head) };
            }
        }
    }

    /// Locate the first node holding a live element.
    ///
    /// Shared traversal entry point for every read-only operation: it
    /// skips the dummy, helps a lagging tail, and physically retires
    /// fully-dead prefixes while looking. Returns null when the queue has
    /// no live element. The returned node's slot was occupied when
    /// observed; callers must re-check before relying on it.
    pub(crate) fn first<'g>(&self, guard: &'g Guard) -> Shared<'g, Node<T>> {
        loop {
            let head = self.head.load(Ordering::Acquire, guard);
            let tail = self.tail.load(Ordering::Acquire, guard);
            let first = unsafe { head.deref() }.next(guard);
            if head != self.head.load(Ordering::Acquire, guard) {
                continue;
            }
            if head == tail {
                if first.is_null() {
                    return Shared::null();
                }
                let _ = self.tail.compare_exchange(
                    tail,
                    first,
                    Ordering::Release,
                    Ordering::Relaxed,
                    guard,
                );
                continue;
            }
            let first_ref = unsafe { first.deref() };
            if !first_ref.item(guard).is_null() {
                return first;
            }
            if self
                .head
                .compare_exchange(head, first, Ordering::Release, Ordering::Relaxed, guard)
                .is_ok()
            {
                unsafe { guard.defer_destroy(head) };
            }
        }
    }

    /// `true` if the queue contains no live elements.
    pub fn is_empty(&self) -> bool {
        let guard = &epoch::pin();
        self.first(guard).is_null()
    }

    /// Count the live elements in the queue.
    ///
    /// This is an O(n) traversal, and under concurrent mutation the count
    /// is best-effort rather than an atomic snapshot. Saturates at
    /// `usize::MAX` rather than overflowing.
    pub fn len(&self) -> usize {
        let guard = &epoch::pin();
        let mut count: usize = 0;
        let mut cursor = self.first(guard);
        while let Some(node) = unsafe { cursor.as_ref() } {
            if !node.item(guard).is_null() {
                count = count.saturating_add(1);
                if count == usize::MAX {
                    break;
                }
            }
            cursor = node.next(guard);
        }
        count
    }

    /// `true` if some live element compares equal to `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        let guard = &epoch::pin();
        let mut cursor = self.first(guard);
        while let Some(node) = unsafe { cursor.as_ref() } {
            if let Some(item) = unsafe { node.item(guard).as_ref() } {
                if item == value {
                    return true;
                }
            }
            cursor = node.next(guard);
        }
        false
    }

    /// Remove the first live element equal to `value`.
    ///
    /// The matched node's slot is emptied in place (lazy deletion); the
    /// node itself stays linked until a later head advance sheds it.
    /// Returns `false` if no element matched, or if a concurrent dequeue
    /// or removal emptied the matched slot first — losing that race is an
    /// accepted outcome and is not retried.
    pub fn remove(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        let guard = &epoch::pin();
        let mut cursor = self.first(guard);
        while let Some(node) = unsafe { cursor.as_ref() } {
            let item = node.item(guard);
            if let Some(current) = unsafe { item.as_ref() } {
                if current == value {
                    if node.clear_item(item, guard) {
                        unsafe { guard.defer_destroy(item) };
                        return true;
                    }
                    return false;
                }
            }
            cursor = node.next(guard);
        }
        false
    }

    /// Collect the live elements into a freshly allocated `Vec`, in FIFO
    /// order. The result shares no storage with the queue.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let guard = &epoch::pin();
        let mut elements = Vec::new();
        let mut cursor = self.first(guard);
        while let Some(node) = unsafe { cursor.as_ref() } {
            if let Some(item) = unsafe { node.item(guard).as_ref() } {
                elements.push(item.clone());
            }
            cursor = node.next(guard);
        }
        elements
    }

    /// A weakly-consistent iterator over the live elements.
    ///
    /// The iterator reflects the queue's content at construction and may,
    /// but need not, reflect later concurrent changes. It never fails due
    /// to concurrent modification. See [`Iter`] for lazy removal support.
    pub fn iter(&self) -> Iter<'_, T>
    where
        T: Clone,
    {
        Iter::new(self)
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for Queue<T> {
    /// Build a queue pre-populated with `iter`'s elements, offered in
    /// iteration order.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let queue = Self::new();
        for value in iter {
            queue.offer(value);
        }
        queue
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.offer(value);
        }
    }
}

impl<T> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<T> Drop for Queue<T> {
    fn drop(&mut self) {
        // Exclusive access: no other thread holds a reference, so the
        // chain can be walked and freed without pinning.
        unsafe {
            let guard = epoch::unprotected();
            let mut cursor = self.head.load(Ordering::Relaxed, guard);
            while !cursor.is_null() {
                let node = cursor.deref();
                let next = node.next(guard);
                let item = node.item(guard);
                if !item.is_null() {
                    drop(item.into_owned());
                }
                drop(cursor.into_owned());
                cursor = next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_creation() {
        let queue: Queue<i32> = Queue::new();

        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.poll(), None);
        assert_eq!(queue.peek(), None);
    }

    #[test]
    fn test_fifo_offer_poll_scenario() {
        let queue = Queue::new();

        assert!(queue.offer(1));
        assert!(queue.offer(2));
        assert!(queue.offer(3));
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.poll(), Some(1));
        assert_eq!(queue.poll(), Some(2));
        assert_eq!(queue.peek(), Some(3));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.poll(), Some(3));
        assert_eq!(queue.poll(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_peek_does_not_remove() {
        let queue = Queue::new();
        queue.offer("only");

        assert_eq!(queue.peek(), Some("only"));
        assert_eq!(queue.peek(), Some("only"));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.poll(), Some("only"));
    }

    #[test]
    fn test_contains_live_elements_only() {
        let queue = Queue::new();
        queue.offer(10);
        queue.offer(20);

        assert!(queue.contains(&10));
        assert!(queue.contains(&20));
        assert!(!queue.contains(&30));

        queue.poll();
        assert!(!queue.contains(&10), "dequeued element must not be found");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let queue = Queue::new();
        queue.offer(1);
        queue.offer(2);
        queue.offer(3);

        assert!(queue.remove(&2));
        assert!(!queue.remove(&2), "second removal of same value must fail");
        assert_eq!(queue.len(), 2);

        // FIFO order of the survivors is unchanged.
        assert_eq!(queue.poll(), Some(1));
        assert_eq!(queue.poll(), Some(3));
    }

    #[test]
    fn test_remove_interior_then_poll_skips_dead_node() {
        let queue = Queue::new();
        for i in 0..5 {
            queue.offer(i);
        }

        // Empty the logical head's slot without unlinking its node.
        assert!(queue.remove(&0));
        assert_eq!(queue.poll(), Some(1), "poll must pass over the dead node");
    }

    #[test]
    fn test_to_vec_snapshot() {
        let queue: Queue<i32> = (1..=4).collect();
        queue.remove(&2);

        assert_eq!(queue.to_vec(), vec![1, 3, 4]);
        // The snapshot is detached from the queue.
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_from_iterator_preserves_order() {
        let queue: Queue<&str> = ["a", "b", "c"].into_iter().collect();

        assert_eq!(queue.poll(), Some("a"));
        assert_eq!(queue.poll(), Some("b"));
        assert_eq!(queue.poll(), Some("c"));
    }

    #[test]
    fn test_extend_appends_at_tail() {
        let mut queue: Queue<i32> = [1, 2].into_iter().collect();
        queue.extend([3, 4]);

        assert_eq!(queue.to_vec(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_drop_frees_live_elements() {
        // Exercised under Miri/leak checkers; holds boxed values so a
        // missed drop would be reported.
        let queue = Queue::new();
        queue.offer(Box::new(1));
        queue.offer(Box::new(2));
        queue.poll();
        drop(queue);
    }

    #[test]
    fn test_debug_reports_len() {
        let queue: Queue<i32> = (0..3).collect();
        let rendered = format!("{:?}", queue);
        assert!(rendered.contains("len: 3"), "got {rendered}");
    }
}
