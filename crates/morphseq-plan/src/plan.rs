use std::ops::Range;

use morphseq_config::SequenceConfig;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Which part of the sequence a plan entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
  /// Node image `index`.
  Node { index: usize },
  /// Frame `frame` (1-based) of transition run `index`.
  Transition { index: usize, frame: usize },
}

/// A single resource in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
  /// Stable 0-based position in the plan.
  pub position: usize,
  /// Logical key, e.g. `01` for a node or `01-007` for a transition frame.
  pub key: String,
  /// Source path relative to the asset root.
  pub source: String,
  pub segment: Segment,
}

/// Ordered list of every resource in a sequence.
///
/// Only [`build_plan`] constructs one, so node positions are strictly
/// increasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourcePlan {
  entries: Vec<PlanEntry>,
  /// Plan position of each node, in node order.
  node_positions: Vec<usize>,
}

/// Flatten a config into node, run, node, run, ..., node order.
pub fn build_plan(config: &SequenceConfig) -> Result<ResourcePlan, PlanError> {
  config.validate()?;

  let mut entries = Vec::with_capacity(config.frame_count());
  let mut node_positions = Vec::with_capacity(config.nodes.len());

  for (index, node) in config.nodes.iter().enumerate() {
    node_positions.push(entries.len());
    entries.push(PlanEntry {
      position: entries.len(),
      key: node.clone(),
      source: config.node_source(node),
      segment: Segment::Node { index },
    });

    // The last node has no outgoing run.
    let Some(run) = config.transitions.get(index) else {
      continue;
    };

    for (offset, key) in run.frame_keys().enumerate() {
      entries.push(PlanEntry {
        position: entries.len(),
        source: config.transition_source(run, &key),
        key,
        segment: Segment::Transition {
          index,
          frame: offset + 1,
        },
      });
    }
  }

  Ok(ResourcePlan {
    entries,
    node_positions,
  })
}

impl ResourcePlan {
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn entries(&self) -> &[PlanEntry] {
    &self.entries
  }

  pub fn get(&self, position: usize) -> Option<&PlanEntry> {
    self.entries.get(position)
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|e| e.key.as_str())
  }

  pub fn node_count(&self) -> usize {
    self.node_positions.len()
  }

  /// Plan position of node `index`.
  pub fn node_position(&self, index: usize) -> Option<usize> {
    self.node_positions.get(index).copied()
  }

  /// Plan positions covered by transition run `index` (excluding both nodes).
  pub fn transition_range(&self, index: usize) -> Option<Range<usize>> {
    let start = *self.node_positions.get(index)?;
    let end = *self.node_positions.get(index + 1)?;
    Some(start + 1..end)
  }

  /// Map node-space progress onto a plan position.
  ///
  /// `progress` runs from `0.0` (first node) to `node_count - 1` (last node).
  /// Whole values land exactly on node images; fractional values land inside
  /// the transition run between the two surrounding nodes. Out-of-range and
  /// NaN inputs are clamped.
  pub fn position_for_progress(&self, progress: f64) -> usize {
    let Some(&last) = self.node_positions.last() else {
      return 0;
    };

    let max = (self.node_positions.len() - 1) as f64;
    let progress = if progress.is_nan() {
      0.0
    } else {
      progress.clamp(0.0, max)
    };

    let index = progress.floor() as usize;
    if index + 1 >= self.node_positions.len() {
      return last;
    }

    let start = self.node_positions[index];
    let end = self.node_positions[index + 1];
    let fraction = progress - index as f64;
    start + (fraction * end.saturating_sub(start) as f64).round() as usize
  }

  /// Segment that owns a plan position.
  pub fn segment_at(&self, position: usize) -> Option<Segment> {
    self.entries.get(position).map(|e| e.segment)
  }
}
