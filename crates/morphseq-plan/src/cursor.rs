//! Node-space playback helpers.
//!
//! A player moves between nodes by animating a progress value from the current
//! node towards a target node. Combined with
//! [`ResourcePlan::position_for_progress`](crate::ResourcePlan::position_for_progress)
//! this picks the frame to show at any point in the animation. Scheduling
//! (frame callbacks, timers) is left to the host.

use std::time::Duration;

/// Time taken to move from one node value to another.
pub const DEFAULT_TWEEN_DURATION: Duration = Duration::from_millis(1000);

/// Cubic ease-in-out over `t` in `[0, 1]`. Inputs outside the range are clamped.
pub fn ease_in_out_cubic(t: f64) -> f64 {
  let t = t.clamp(0.0, 1.0);
  if t < 0.5 {
    4.0 * t * t * t
  } else {
    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
  }
}

/// An eased move from one node-space value to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTween {
  pub from: f64,
  pub to: f64,
  pub duration: Duration,
}

impl NodeTween {
  pub fn new(from: f64, to: f64) -> Self {
    Self::with_duration(from, to, DEFAULT_TWEEN_DURATION)
  }

  pub fn with_duration(from: f64, to: f64, duration: Duration) -> Self {
    Self { from, to, duration }
  }

  /// Value after `elapsed` time. Lands exactly on `to` once finished.
  pub fn value_at(&self, elapsed: Duration) -> f64 {
    if self.is_finished(elapsed) {
      return self.to;
    }
    let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
    self.from + (self.to - self.from) * ease_in_out_cubic(t)
  }

  pub fn is_finished(&self, elapsed: Duration) -> bool {
    elapsed >= self.duration
  }

  /// Start a new tween towards `target` from wherever this one is at `elapsed`.
  ///
  /// The returned tween replaces this one; its clock starts at zero.
  pub fn retarget(&self, elapsed: Duration, target: f64) -> Self {
    Self::with_duration(self.value_at(elapsed), target, self.duration)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ease_endpoints() {
    assert_eq!(ease_in_out_cubic(0.0), 0.0);
    assert_eq!(ease_in_out_cubic(0.5), 0.5);
    assert_eq!(ease_in_out_cubic(1.0), 1.0);
    assert_eq!(ease_in_out_cubic(-1.0), 0.0);
    assert_eq!(ease_in_out_cubic(2.0), 1.0);
  }

  #[test]
  fn test_ease_is_monotonic() {
    let mut prev = 0.0;
    for i in 0..=100 {
      let v = ease_in_out_cubic(i as f64 / 100.0);
      assert!(v >= prev);
      prev = v;
    }
  }

  #[test]
  fn test_tween_reaches_target() {
    let tween = NodeTween::new(0.0, 3.0);
    assert_eq!(tween.value_at(Duration::ZERO), 0.0);
    assert_eq!(tween.value_at(Duration::from_millis(500)), 1.5);
    assert_eq!(tween.value_at(DEFAULT_TWEEN_DURATION), 3.0);
    assert_eq!(tween.value_at(Duration::from_secs(5)), 3.0);
    assert!(tween.is_finished(DEFAULT_TWEEN_DURATION));
    assert!(!tween.is_finished(Duration::from_millis(999)));
  }

  #[test]
  fn test_tween_backwards() {
    let tween = NodeTween::new(2.0, 0.0);
    let mid = tween.value_at(Duration::from_millis(250));
    assert!(mid < 2.0 && mid > 1.0);
  }

  #[test]
  fn test_retarget_starts_from_current_value() {
    let tween = NodeTween::new(0.0, 2.0);
    let elapsed = Duration::from_millis(500);
    let next = tween.retarget(elapsed, 0.0);

    assert_eq!(next.from, 1.0);
    assert_eq!(next.to, 0.0);
    assert_eq!(next.value_at(Duration::ZERO), 1.0);
    assert_eq!(next.value_at(next.duration), 0.0);
  }
}
