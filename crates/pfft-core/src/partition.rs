//! Partition planning: which transform points each worker owns.
//!
//! Positions are 0-based within the `points` transform points; position `p`
//! lives at global index `p + 1` of the shared arrays (slot 0 is the
//! sentinel). Every rank recomputes the same plan from
//! `(rank, workers, points)`, so plans are never transmitted.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use num_integer::Integer;
use serde::{Deserialize, Serialize};

use crate::error::FftError;
use crate::role::Role;

/// Contiguous half-open run of positions owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Partition {
    /// First owned position.
    pub offset: usize,
    /// Number of owned positions.
    pub count: usize,
}

impl Partition {
    /// The partition of the coordinator.
    pub const EMPTY: Self = Self {
        offset: 0,
        count: 0,
    };

    /// Owned indices of the shared arrays.
    #[must_use]
    pub fn global_indices(&self) -> Range<usize> {
        self.offset + 1..self.offset + self.count + 1
    }

    /// Whether nothing is owned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// What to do with points left over when workers do not divide them evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemainderPolicy {
    /// Require an even split; anything else is a configuration error.
    Strict,
    /// The first `points % workers` workers take one extra point.
    #[default]
    Spread,
}

impl FromStr for RemainderPolicy {
    type Err = FftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "spread" => Ok(Self::Spread),
            other => Err(FftError::Config(format!(
                "unknown remainder policy: {other} (expected strict or spread)"
            ))),
        }
    }
}

impl fmt::Display for RemainderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "strict",
            Self::Spread => "spread",
        })
    }
}

/// Deterministic planner for one `(workers, points)` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionPlanner {
    workers: usize,
    points: usize,
    base: usize,
    extra: usize,
    policy: RemainderPolicy,
}

impl PartitionPlanner {
    /// Validate the shape and build a planner.
    pub fn new(workers: usize, points: usize, policy: RemainderPolicy) -> Result<Self, FftError> {
        if workers == 0 {
            return Err(FftError::Config(
                "no workers: at least two ranks are required".into(),
            ));
        }
        let (base, extra) = points.div_rem(&workers);
        if policy == RemainderPolicy::Strict && extra != 0 {
            return Err(FftError::Config(format!(
                "{workers} workers do not evenly divide {points} points"
            )));
        }
        Ok(Self {
            workers,
            points,
            base,
            extra,
            policy,
        })
    }

    /// Number of workers.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Number of transform points.
    #[must_use]
    pub fn points(&self) -> usize {
        self.points
    }

    /// Partition of `role`; the coordinator owns nothing.
    pub fn plan(&self, role: Role) -> Result<Partition, FftError> {
        let rank = match role {
            Role::Coordinator => return Ok(Partition::EMPTY),
            Role::Worker(rank) if (1..=self.workers).contains(&rank) => rank,
            Role::Worker(rank) => {
                return Err(FftError::Config(format!(
                    "rank {rank} outside the {} workers",
                    self.workers
                )))
            }
        };

        let w = rank - 1;
        Ok(match self.policy {
            RemainderPolicy::Strict => Partition {
                offset: w * self.base,
                count: self.base,
            },
            RemainderPolicy::Spread => Partition {
                offset: w * self.base + w.min(self.extra),
                count: self.base + usize::from(w < self.extra),
            },
        })
    }

    /// Partitions of all workers, in rank order.
    pub fn partitions(&self) -> Result<Vec<Partition>, FftError> {
        (1..=self.workers)
            .map(|rank| self.plan(Role::Worker(rank)))
            .collect()
    }
}

/// Plan the partition of `role` for `workers` workers over `points` points.
pub fn plan(
    role: Role,
    workers: usize,
    points: usize,
    policy: RemainderPolicy,
) -> Result<Partition, FftError> {
    PartitionPlanner::new(workers, points, policy)?.plan(role)
}

/// Check that `partitions` cover `0..points` exactly once.
pub fn validate_cover(partitions: &[Partition], points: usize) -> Result<(), FftError> {
    let mut sorted: Vec<&Partition> = partitions.iter().filter(|p| !p.is_empty()).collect();
    sorted.sort_by_key(|p| p.offset);

    let mut next = 0;
    for part in sorted {
        if part.offset != next {
            return Err(FftError::Config(format!(
                "partition plan {} at position {next}",
                if part.offset > next { "leaves a gap" } else { "overlaps" }
            )));
        }
        next = part.offset + part.count;
    }
    if next != points {
        return Err(FftError::Config(format!(
            "partition plan covers {next} of {points} points"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_even_split() {
        let planner = PartitionPlanner::new(4, 16, RemainderPolicy::Strict).unwrap();
        assert_eq!(
            planner.plan(Role::Worker(1)).unwrap(),
            Partition {
                offset: 0,
                count: 4
            }
        );
        assert_eq!(
            planner.plan(Role::Worker(4)).unwrap(),
            Partition {
                offset: 12,
                count: 4
            }
        );
        assert_eq!(planner.plan(Role::Coordinator).unwrap(), Partition::EMPTY);
    }

    #[test]
    fn strict_rejects_remainder() {
        assert!(matches!(
            PartitionPlanner::new(3, 8, RemainderPolicy::Strict),
            Err(FftError::Config(_))
        ));
    }

    #[test]
    fn spread_gives_first_workers_extra() {
        let planner = PartitionPlanner::new(3, 8, RemainderPolicy::Spread).unwrap();
        let parts = planner.partitions().unwrap();
        assert_eq!(
            parts,
            vec![
                Partition { offset: 0, count: 3 },
                Partition { offset: 3, count: 3 },
                Partition { offset: 6, count: 2 },
            ]
        );
        validate_cover(&parts, 8).unwrap();
    }

    #[test]
    fn more_workers_than_points() {
        let planner = PartitionPlanner::new(6, 4, RemainderPolicy::Spread).unwrap();
        let parts = planner.partitions().unwrap();
        assert_eq!(parts.iter().filter(|p| p.is_empty()).count(), 2);
        validate_cover(&parts, 4).unwrap();
    }

    #[test]
    fn zero_workers_is_fatal() {
        assert!(matches!(
            plan(Role::Worker(1), 0, 8, RemainderPolicy::Spread),
            Err(FftError::Config(_))
        ));
    }

    #[test]
    fn rank_beyond_workers_rejected() {
        assert!(plan(Role::Worker(5), 4, 8, RemainderPolicy::Spread).is_err());
    }

    #[test]
    fn global_indices_skip_sentinel() {
        let part = Partition {
            offset: 4,
            count: 2,
        };
        assert_eq!(part.global_indices(), 5..7);
    }

    #[test]
    fn validate_cover_detects_gap_and_overlap() {
        let gap = [
            Partition { offset: 0, count: 2 },
            Partition { offset: 3, count: 1 },
        ];
        assert!(validate_cover(&gap, 4).is_err());

        let overlap = [
            Partition { offset: 0, count: 3 },
            Partition { offset: 2, count: 2 },
        ];
        assert!(validate_cover(&overlap, 4).is_err());

        let short = [Partition { offset: 0, count: 3 }];
        assert!(validate_cover(&short, 4).is_err());
    }

    #[test]
    fn policy_from_str() {
        assert_eq!("Strict".parse::<RemainderPolicy>().unwrap(), RemainderPolicy::Strict);
        assert_eq!("spread".parse::<RemainderPolicy>().unwrap(), RemainderPolicy::Spread);
        assert!("round-robin".parse::<RemainderPolicy>().is_err());
        assert_eq!(RemainderPolicy::default().to_string(), "spread");
    }
}
