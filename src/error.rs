//! Queue Error Types

/// Failures surfaced by the queue and its snapshot codec.
///
/// Empty-queue `poll`/`peek` and iterator exhaustion are reported as
/// `None`, not as errors. Transient compare-and-swap failures inside the
/// lock-free loops are internal retries and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("iterator remove requires a preceding call to next")]
    IteratorState,

    #[error("snapshot stream error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed snapshot record: {0}")]
    Record(#[from] serde_json::Error),

    #[error("snapshot stream ended before the end-of-sequence marker")]
    SnapshotTruncated,
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
