//! Linked node primitive for the queue chain.
//!
//! A node owns one optional element slot and a pointer to its successor.
//! Both fields are epoch-managed atomic references: the slot is emptied at
//! most once (lazy deletion), and the successor goes from end-marker to a
//! concrete node at most once. Field mutation is single-word CAS only.

use crossbeam_epoch::{Atomic, Guard, Owned, Shared};
use std::sync::atomic::Ordering;

pub(crate) struct Node<T> {
    /// Element slot; null means logically empty (dummy or deleted).
    item: Atomic<T>,
    /// Successor; null is the end-marker.
    next: Atomic<Node<T>>,
}

impl<T> Node<T> {
    /// A data node holding `value`, with no successor yet.
    pub(crate) fn data(value: T) -> Self {
        Self {
            item: Atomic::new(value),
            next: Atomic::null(),
        }
    }

    /// The permanent dummy node a queue starts with.
    pub(crate) fn sentinel() -> Self {
        Self {
            item: Atomic::null(),
            next: Atomic::null(),
        }
    }

    pub(crate) fn item<'g>(&self, guard: &'g Guard) -> Shared<'g, T> {
        self.item.load(Ordering::Acquire, guard)
    }

    /// Empty the slot, succeeding only if it still holds `observed`.
    ///
    /// The winner becomes the sole owner of the element allocation and is
    /// responsible for retiring it.
    pub(crate) fn clear_item(&self, observed: Shared<'_, T>, guard: &Guard) -> bool {
        self.item
            .compare_exchange(
                observed,
                Shared::null(),
                Ordering::AcqRel,
                Ordering::Acquire,
                guard,
            )
            .is_ok()
    }

    pub(crate) fn next<'g>(&self, guard: &'g Guard) -> Shared<'g, Node<T>> {
        self.next.load(Ordering::Acquire, guard)
    }

    /// Link `node` as the successor, succeeding only if this node is still
    /// the last one. Returns the linked pointer, or hands `node` back so
    /// the caller can retry against the new tail.
    pub(crate) fn link_next<'g>(
        &self,
        node: Owned<Node<T>>,
        guard: &'g Guard,
    ) -> Result<Shared<'g, Node<T>>, Owned<Node<T>>> {
        self.next
            .compare_exchange(
                Shared::null(),
                node,
                Ordering::Release,
                Ordering::Relaxed,
                guard,
            )
            .map_err(|err| err.new)
    }
}
