//! # pfft-engine
//!
//! The distributed part of the transform: the butterfly stage schedule, the
//! two-barrier phase protocol and the rank program run on every rank of a
//! [`pfft_shmem::World`].

pub mod engine;
pub mod interfaces;
pub mod observer;
pub mod phase;
pub mod stage;

pub use engine::{execute, Engine, SignalHandles};
pub use interfaces::{SpectrumPresenter, TransformResult};
pub use observer::{NoOpStageObserver, StageCounter, StageObserver, TracingObserver};
pub use phase::{CommitPhase, ComputePhase, ComputedStage, SignalAccess, StageReport};
pub use stage::{Butterfly, Stage, StageSchedule};
