//! Errors raised by the shared heap and the collectives.

use std::time::Duration;

/// Error type for world, heap and collective operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShmemError {
    /// A world was configured without ranks.
    #[error("a world needs at least one rank")]
    EmptyWorld,

    /// Requested a segment of length zero.
    #[error("cannot allocate a zero-length segment")]
    ZeroLength,

    /// Handle refers to a segment that is not (or no longer) in the heap.
    #[error("unknown segment {0}")]
    UnknownSegment(u64),

    /// Index outside the segment.
    #[error("index {index} out of bounds for segment of length {len}")]
    OutOfBounds {
        /// Offending index.
        index: usize,
        /// Segment length.
        len: usize,
    },

    /// Write outside the writer's owned range.
    #[error("rank {rank} does not own index {index} (owned {start}..{end})")]
    NotOwned {
        /// Writing rank.
        rank: usize,
        /// Offending index.
        index: usize,
        /// Start of the owned range.
        start: usize,
        /// End of the owned range.
        end: usize,
    },

    /// Local access to a segment owned by another rank.
    #[error("rank {rank} cannot access segment owned by rank {owner} locally")]
    NotLocal {
        /// Calling rank.
        rank: usize,
        /// Owning rank.
        owner: usize,
    },

    /// Broadcast root outside the world.
    #[error("broadcast root {root} out of range for {rank_n} ranks")]
    BadRoot {
        /// Requested root.
        root: usize,
        /// Number of ranks.
        rank_n: usize,
    },

    /// The broadcast root supplied no value.
    #[error("broadcast root {0} supplied no value")]
    MissingPayload(usize),

    /// Broadcast value did not match the type the receiver asked for.
    #[error("broadcast payload type mismatch on rank {0}")]
    TypeMismatch(usize),

    /// A rank waited longer than the configured bound.
    #[error("rank {rank} timed out after {timeout:?} in {op}")]
    Timeout {
        /// Waiting rank.
        rank: usize,
        /// Collective being waited on.
        op: &'static str,
        /// Configured bound.
        timeout: Duration,
    },

    /// Another rank failed; the world can make no further progress.
    #[error("world poisoned: {0}")]
    Poisoned(String),

    /// The run was cancelled from outside the world.
    #[error("run cancelled")]
    Cancelled,

    /// A rank thread panicked.
    #[error("rank {0} panicked")]
    RankPanicked(usize),
}
