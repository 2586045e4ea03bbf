//! # pfft-shmem
//!
//! A small partitioned global address space for SPMD programs.
//!
//! A [`World`] launches a fixed number of ranks that run the same program.
//! Ranks allocate segments in the shared heap, hand out [`GlobalArray`]
//! handles through [`Pe::broadcast`], and access remote memory with one-sided
//! `rget`/`rput` operations through reader and writer capabilities.
//! Collective phases are separated by a poisonable [`PhaseBarrier`].
#![warn(missing_docs)]

pub mod barrier;
pub mod element;
pub mod error;
pub mod global_array;
pub mod stats;
pub mod world;

pub use barrier::{BarrierWait, PhaseBarrier};
pub use element::Element;
pub use error::ShmemError;
pub use global_array::{ArrayReader, GlobalArray, PartitionWriter, SegmentId};
pub use stats::{CommSnapshot, CommStats};
pub use world::{CancelHandle, Pe, World, WorldConfig};
