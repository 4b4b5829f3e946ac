//! morphseq Plan
//!
//! This crate provides the flattened [`ResourcePlan`] for a sequence. A plan is
//! the validated, ordered form of a [`SequenceConfig`]: every node image and
//! every transition frame at a stable 0-based position, ready to be loaded.
//!
//! Key differences from `morphseq-config`:
//! - Node/run alternation is validated
//! - Every frame has a logical key and a relative source path
//! - Node positions and transition ranges are indexed for playback lookups
//!
//! The [`cursor`] module maps node-space playback progress onto plan
//! positions.
//!
//! [`SequenceConfig`]: morphseq_config::SequenceConfig

pub mod cursor;
mod error;
mod plan;

pub use cursor::{DEFAULT_TWEEN_DURATION, NodeTween, ease_in_out_cubic};
pub use error::PlanError;
pub use plan::{PlanEntry, ResourcePlan, Segment, build_plan};
