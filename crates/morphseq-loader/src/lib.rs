//! Sequence loading for morphseq.
//!
//! This crate provides the [`SequenceLoader`] which handles:
//! - Flattening a [`SequenceConfig`] into a [`ResourcePlan`]
//! - Issuing every fetch of the plan concurrently
//! - Aggregating progress into a non-decreasing percentage
//! - Substituting placeholders for images that fail to load
//! - Indexed access to the loaded frames
//!
//! Progress stops at [`LOAD_PROGRESS_CEILING`]; the remaining percentage
//! belongs to whatever post-processing the caller does after loading.
//!
//! [`SequenceConfig`]: morphseq_config::SequenceConfig
//! [`ResourcePlan`]: morphseq_plan::ResourcePlan

mod error;
mod frame;
mod loader;
mod notifier;

pub use error::LoaderError;
pub use frame::Frame;
pub use loader::{LOAD_PROGRESS_CEILING, LoadOutcome, LoadState, SequenceLoader};
pub use notifier::{ChannelNotifier, NoopNotifier, ProgressNotifier};
