use morphseq_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
  #[error("invalid sequence config: {0}")]
  InvalidConfig(#[from] ConfigError),
}
