//! # pfft-cli
//!
//! Sample input parsing, spectrum rendering and shell completion.

pub mod completion;
pub mod input;
pub mod output;
pub mod presenter;

pub use input::{parse_samples, read_samples};
pub use presenter::{presenter_for, JsonPresenter, OutputFormat, TextPresenter};
