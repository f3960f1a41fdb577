//! Core queue functionality tests

#[cfg(test)]
mod tests {
    use crate::Queue;

    #[derive(Debug, Clone, PartialEq)]
    struct Job {
        id: u32,
        payload: String,
    }

    fn job(id: u32) -> Job {
        Job {
            id,
            payload: format!("job-{}", id),
        }
    }

    #[test]
    fn test_add_is_offer() {
        let queue = Queue::new();
        assert!(queue.add(1));
        assert!(queue.offer(2));
        assert_eq!(queue.to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_default_is_empty() {
        let queue: Queue<Job> = Queue::default();
        assert!(queue.is_empty());
        assert_eq!(queue.poll(), None);
    }

    #[test]
    fn test_struct_elements_round_through_all_operations() {
        let queue = Queue::new();
        for id in 0..4 {
            queue.offer(job(id));
        }

        assert_eq!(queue.len(), 4);
        assert!(queue.contains(&job(2)));
        assert!(queue.remove(&job(2)));
        assert!(!queue.contains(&job(2)));

        assert_eq!(queue.peek(), Some(job(0)));
        assert_eq!(queue.poll(), Some(job(0)));
        assert_eq!(queue.to_vec(), vec![job(1), job(3)]);
    }

    #[test]
    fn test_len_counts_only_live_elements() {
        let queue: Queue<i32> = (0..10).collect();

        assert_eq!(queue.len(), 10);
        queue.remove(&3);
        queue.remove(&7);
        assert_eq!(queue.len(), 8, "emptied slots must not be counted");

        queue.poll();
        assert_eq!(queue.len(), 7);
    }

    #[test]
    fn test_queue_is_reusable_after_drain() {
        let queue = Queue::new();
        queue.offer("first");
        assert_eq!(queue.poll(), Some("first"));
        assert!(queue.is_empty());

        // The dummy-node chain must accept new elements after draining.
        queue.offer("second");
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.poll(), Some("second"));
    }

    #[test]
    fn test_to_vec_is_detached_from_queue() {
        let queue: Queue<i32> = (1..=3).collect();
        let mut snapshot = queue.to_vec();
        snapshot.push(99);

        assert_eq!(queue.len(), 3);
        assert!(!queue.contains(&99));
    }

    #[test]
    fn test_interleaved_offers_and_polls_stay_fifo() {
        let queue = Queue::new();
        queue.offer(1);
        queue.offer(2);
        assert_eq!(queue.poll(), Some(1));
        queue.offer(3);
        assert_eq!(queue.poll(), Some(2));
        queue.offer(4);
        assert_eq!(queue.to_vec(), vec![3, 4]);
    }
}
