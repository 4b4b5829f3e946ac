//! Error types for sequence loading.

use morphseq_plan::PlanError;
use thiserror::Error;

/// Errors that abort a whole load.
///
/// Individual image failures never show up here; they are replaced by
/// placeholders.
#[derive(Debug, Error)]
pub enum LoaderError {
  /// The resource plan could not be built from the config.
  #[error("failed to build resource plan: {0}")]
  Plan(#[from] PlanError),
}
