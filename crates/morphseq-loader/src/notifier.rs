//! Progress notifiers.
//!
//! The loader reports progress as a percentage after every resolved image and
//! once more on completion. Notifiers decide what to do with the value
//! (update a UI, forward it over a channel, ignore it).

use tokio::sync::mpsc;

/// Trait for receiving load progress.
///
/// Called from the task driving the load, one value at a time, in
/// non-decreasing order.
pub trait ProgressNotifier: Send + Sync {
  /// Called with the current progress percentage.
  fn notify(&self, percent: u8);
}

impl<F> ProgressNotifier for F
where
  F: Fn(u8) + Send + Sync,
{
  fn notify(&self, percent: u8) {
    self(percent)
  }
}

/// A no-op notifier that discards all progress.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ProgressNotifier for NoopNotifier {
  fn notify(&self, _percent: u8) {}
}

/// A notifier that sends progress to an unbounded channel.
///
/// Use this when progress is consumed by another task (a UI loop, a
/// websocket). The loader never waits on the consumer.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<u8>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<u8>) -> Self {
    Self { sender }
  }
}

impl ProgressNotifier for ChannelNotifier {
  fn notify(&self, percent: u8) {
    // Receiver may have been dropped
    let _ = self.sender.send(percent);
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;

  #[test]
  fn test_closure_notifier() {
    let seen = Mutex::new(Vec::new());
    let notifier = |p: u8| seen.lock().unwrap().push(p);
    notifier.notify(10);
    notifier.notify(20);
    assert_eq!(*seen.lock().unwrap(), vec![10, 20]);
  }

  #[test]
  fn test_channel_notifier() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let notifier = ChannelNotifier::new(tx);
    notifier.notify(45);
    assert_eq!(rx.try_recv().unwrap(), 45);
  }

  #[test]
  fn test_channel_notifier_ignores_closed_receiver() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    ChannelNotifier::new(tx).notify(90);
  }
}
