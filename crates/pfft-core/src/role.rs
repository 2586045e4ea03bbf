//! Rank roles.

use std::fmt;

/// What a rank does in the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Rank 0: seeds the shared arrays and presents the result.
    Coordinator,
    /// Ranks 1..n: compute butterflies over their partition.
    Worker(usize),
}

impl Role {
    /// Rank of the coordinator.
    pub const COORDINATOR_RANK: usize = 0;

    /// Role of `rank`.
    #[must_use]
    pub fn from_rank(rank: usize) -> Self {
        if rank == Self::COORDINATOR_RANK {
            Self::Coordinator
        } else {
            Self::Worker(rank)
        }
    }

    /// Whether this is the coordinator.
    #[must_use]
    pub fn is_coordinator(self) -> bool {
        matches!(self, Self::Coordinator)
    }

    /// Short label used in log records.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Coordinator => "coordinator",
            Self::Worker(_) => "worker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinator => f.write_str("coordinator"),
            Self::Worker(rank) => write!(f, "worker({rank})"),
        }
    }
}
