use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Nominal width of a sequence frame, in pixels.
pub const DEFAULT_FRAME_WIDTH: u32 = 2366;
/// Nominal height of a sequence frame, in pixels.
pub const DEFAULT_FRAME_HEIGHT: u32 = 1318;
pub const DEFAULT_EXTENSION: &str = "webp";
pub const DEFAULT_TRANSITION_DIR: &str = "morphing";

/// A run of transition frames between two neighbouring nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRun {
  /// Run name, e.g. "01". Used as both the directory and the key prefix.
  pub name: String,
  /// Number of frames in the run.
  pub count: usize,
}

impl TransitionRun {
  pub fn new(name: impl Into<String>, count: usize) -> Self {
    Self {
      name: name.into(),
      count,
    }
  }

  /// Key of the frame at 1-based `index`, e.g. `01-007`.
  ///
  /// Frames are numbered from `001`; there is no `000` frame.
  pub fn frame_key(&self, index: usize) -> String {
    format!("{}-{:03}", self.name, index)
  }

  /// All frame keys of the run in playback order.
  pub fn frame_keys(&self) -> impl Iterator<Item = String> + '_ {
    (1..=self.count).map(|i| self.frame_key(i))
  }
}

/// Declarative description of a morphing image sequence.
///
/// Nodes and runs alternate: node, run, node, run, ..., node. A sequence with
/// N nodes therefore carries exactly N-1 runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceConfig {
  /// Node image identifiers, in order. Each is also the node's file stem.
  pub nodes: Vec<String>,
  /// Transition runs; run `i` sits between node `i` and node `i + 1`.
  pub transitions: Vec<TransitionRun>,
  /// Nominal frame width, used for placeholders.
  #[serde(default = "default_frame_width")]
  pub frame_width: u32,
  /// Nominal frame height, used for placeholders.
  #[serde(default = "default_frame_height")]
  pub frame_height: u32,
  /// File extension of every frame, without the dot.
  #[serde(default = "default_extension")]
  pub extension: String,
  /// Directory holding one sub-directory per transition run.
  #[serde(default = "default_transition_dir")]
  pub transition_dir: String,
}

fn default_frame_width() -> u32 {
  DEFAULT_FRAME_WIDTH
}

fn default_frame_height() -> u32 {
  DEFAULT_FRAME_HEIGHT
}

fn default_extension() -> String {
  DEFAULT_EXTENSION.to_string()
}

fn default_transition_dir() -> String {
  DEFAULT_TRANSITION_DIR.to_string()
}

impl Default for SequenceConfig {
  /// The production sequence: four nodes and three runs of 227, 286 and 295
  /// frames, extracted at 2366x1318.
  fn default() -> Self {
    Self {
      nodes: vec![
        "0".to_string(),
        "01".to_string(),
        "02".to_string(),
        "03".to_string(),
      ],
      transitions: vec![
        TransitionRun::new("01", 227),
        TransitionRun::new("02", 286),
        TransitionRun::new("03", 295),
      ],
      frame_width: DEFAULT_FRAME_WIDTH,
      frame_height: DEFAULT_FRAME_HEIGHT,
      extension: DEFAULT_EXTENSION.to_string(),
      transition_dir: DEFAULT_TRANSITION_DIR.to_string(),
    }
  }
}

impl SequenceConfig {
  /// Create a config with the given nodes and runs and default layout.
  pub fn new(nodes: Vec<String>, transitions: Vec<TransitionRun>) -> Self {
    Self {
      nodes,
      transitions,
      ..Self::default()
    }
  }

  /// Parse and validate a config from a JSON string.
  pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
    let config: SequenceConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Read, parse and validate a config from a JSON file.
  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Self::from_json_str(&content)
  }

  /// Check the node/run alternation and layout constraints.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.nodes.is_empty() {
      return Err(ConfigError::NoNodes);
    }

    let expected = self.nodes.len() - 1;
    if self.transitions.len() != expected {
      return Err(ConfigError::RunCountMismatch {
        nodes: self.nodes.len(),
        expected,
        actual: self.transitions.len(),
      });
    }

    if let Some(index) = self.transitions.iter().position(|r| r.name.is_empty()) {
      return Err(ConfigError::EmptyRunName { index });
    }

    if self.frame_width == 0 || self.frame_height == 0 {
      return Err(ConfigError::InvalidFrameSize {
        width: self.frame_width,
        height: self.frame_height,
      });
    }

    Ok(())
  }

  /// Total number of frames (nodes plus every transition frame).
  pub fn frame_count(&self) -> usize {
    self.nodes.len() + self.transitions.iter().map(|r| r.count).sum::<usize>()
  }

  /// Relative source path of a node image, e.g. `01.webp`.
  pub fn node_source(&self, node: &str) -> String {
    format!("{}.{}", node, self.extension)
  }

  /// Relative source path of a transition frame, e.g. `morphing/01/01-001.webp`.
  pub fn transition_source(&self, run: &TransitionRun, key: &str) -> String {
    format!(
      "{}/{}/{}.{}",
      self.transition_dir, run.name, key, self.extension
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_is_valid() {
    let config = SequenceConfig::default();
    config.validate().unwrap();
    assert_eq!(config.nodes.len(), 4);
    assert_eq!(config.transitions.len(), 3);
    assert_eq!(config.frame_count(), 812);
  }

  #[test]
  fn test_frame_keys_start_at_one() {
    let run = TransitionRun::new("02", 12);
    let keys: Vec<String> = run.frame_keys().collect();

    assert_eq!(keys.len(), 12);
    assert_eq!(keys[0], "02-001");
    assert_eq!(keys[9], "02-010");
    assert_eq!(keys[11], "02-012");
    assert!(!keys.iter().any(|k| k.ends_with("-000")));
  }

  #[test]
  fn test_frame_key_wider_than_padding() {
    let run = TransitionRun::new("x", 1200);
    assert_eq!(run.frame_key(1000), "x-1000");
  }

  #[test]
  fn test_empty_run_has_no_keys() {
    let run = TransitionRun::new("01", 0);
    assert_eq!(run.frame_keys().count(), 0);
  }

  #[test]
  fn test_sources() {
    let config = SequenceConfig::default();
    assert_eq!(config.node_source("01"), "01.webp");
    assert_eq!(
      config.transition_source(&config.transitions[0], "01-001"),
      "morphing/01/01-001.webp"
    );
  }

  #[test]
  fn test_validate_rejects_no_nodes() {
    let config = SequenceConfig::new(vec![], vec![]);
    assert!(matches!(config.validate(), Err(ConfigError::NoNodes)));
  }

  #[test]
  fn test_validate_rejects_run_mismatch() {
    let config = SequenceConfig::new(
      vec!["a".to_string(), "b".to_string()],
      vec![TransitionRun::new("r1", 3), TransitionRun::new("r2", 3)],
    );
    match config.validate() {
      Err(ConfigError::RunCountMismatch {
        nodes,
        expected,
        actual,
      }) => {
        assert_eq!(nodes, 2);
        assert_eq!(expected, 1);
        assert_eq!(actual, 2);
      }
      other => panic!("expected RunCountMismatch, got {:?}", other),
    }
  }

  #[test]
  fn test_validate_rejects_empty_run_name() {
    let config = SequenceConfig::new(
      vec!["a".to_string(), "b".to_string()],
      vec![TransitionRun::new("", 3)],
    );
    assert!(matches!(
      config.validate(),
      Err(ConfigError::EmptyRunName { index: 0 })
    ));
  }

  #[test]
  fn test_json_defaults_are_filled_in() {
    let json = r#"{
      "nodes": ["a", "b"],
      "transitions": [{ "name": "ab", "count": 5 }]
    }"#;

    let config = SequenceConfig::from_json_str(json).unwrap();
    assert_eq!(config.frame_width, DEFAULT_FRAME_WIDTH);
    assert_eq!(config.frame_height, DEFAULT_FRAME_HEIGHT);
    assert_eq!(config.extension, "webp");
    assert_eq!(config.transition_dir, "morphing");
    assert_eq!(config.frame_count(), 7);
  }

  #[test]
  fn test_json_invalid_shape_is_rejected() {
    let json = r#"{ "nodes": ["a", "b"], "transitions": [] }"#;
    assert!(matches!(
      SequenceConfig::from_json_str(json),
      Err(ConfigError::RunCountMismatch { .. })
    ));
  }

  #[test]
  fn test_json_parse_error() {
    assert!(matches!(
      SequenceConfig::from_json_str("{ not json"),
      Err(ConfigError::Parse(_))
    ));
  }

  #[test]
  fn test_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sequence.json");
    let config = SequenceConfig::default();
    std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

    let loaded = SequenceConfig::from_json_file(&path).unwrap();
    assert_eq!(loaded, config);
  }
}
