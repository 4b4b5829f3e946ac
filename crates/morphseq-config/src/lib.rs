//! morphseq Config
//!
//! This crate contains the serializable sequence configuration types for
//! morphseq. A [`SequenceConfig`] describes an image sequence as a list of node
//! frames with a transition run between each pair of neighbouring nodes:
//!
//! ```text
//! node 0 → run 01 → node 1 → run 02 → node 2 → run 03 → node 3
//! ```
//!
//! Configuration can be loaded from JSON files or taken from
//! [`SequenceConfig::default`], which describes the production sequence.
//! The plan crate flattens a validated config into an ordered list of
//! resources for loading.

mod error;
mod sequence;

pub use error::ConfigError;
pub use sequence::{
  DEFAULT_EXTENSION, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, DEFAULT_TRANSITION_DIR,
  SequenceConfig, TransitionRun,
};
