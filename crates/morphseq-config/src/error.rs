use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to parse config: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("sequence has no node images")]
  NoNodes,

  #[error("expected {expected} transition runs between {nodes} nodes, got {actual}")]
  RunCountMismatch {
    nodes: usize,
    expected: usize,
    actual: usize,
  },

  #[error("transition run {index} has an empty name")]
  EmptyRunName { index: usize },

  #[error("frame size must be non-zero, got {width}x{height}")]
  InvalidFrameSize { width: u32, height: u32 },
}
