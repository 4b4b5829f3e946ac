//! Sequence loader implementation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use morphseq_config::SequenceConfig;
use morphseq_fetch::Fetcher;
use morphseq_plan::{PlanEntry, ResourcePlan, build_plan};
use tracing::{debug, error, info, instrument, warn};

use crate::error::LoaderError;
use crate::frame::Frame;
use crate::notifier::ProgressNotifier;

/// Highest progress the loader reports.
///
/// The remaining percentage is left to the caller for whatever it does once
/// the images are in (warming caches, loading other assets).
pub const LOAD_PROGRESS_CEILING: u8 = 90;

/// Lifecycle of a [`SequenceLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
  NotStarted,
  Loading,
  Loaded,
}

/// What a call to [`SequenceLoader::load`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
  /// This call ran the load to completion.
  Completed { total: usize, placeholders: usize },
  /// Another load was in flight; nothing was done.
  AlreadyLoading,
  /// The sequence was already loaded; nothing was done.
  AlreadyLoaded,
}

struct LoaderInner {
  state: LoadState,
  progress: u8,
  frames: Vec<Frame>,
  plan: Option<Arc<ResourcePlan>>,
}

/// Loads every image of a sequence once and serves them by position.
///
/// The loader owns the loaded frames for its lifetime. Loading happens at
/// most once: further calls to [`load`](Self::load) while loading or after
/// completion return without fetching anything.
pub struct SequenceLoader<F> {
  config: SequenceConfig,
  fetcher: F,
  inner: Mutex<LoaderInner>,
}

impl<F: Fetcher> SequenceLoader<F> {
  /// Create a loader for `config` that fetches images through `fetcher`.
  pub fn new(config: SequenceConfig, fetcher: F) -> Self {
    Self {
      config,
      fetcher,
      inner: Mutex::new(LoaderInner {
        state: LoadState::NotStarted,
        progress: 0,
        frames: Vec::new(),
        plan: None,
      }),
    }
  }

  pub fn config(&self) -> &SequenceConfig {
    &self.config
  }

  pub fn fetcher(&self) -> &F {
    &self.fetcher
  }

  /// Flatten the config into the load order.
  pub fn build_plan(&self) -> Result<ResourcePlan, LoaderError> {
    Ok(build_plan(&self.config)?)
  }

  /// Load every image of the sequence.
  ///
  /// All fetches are issued at once. `notifier` receives the progress after
  /// each image resolves and [`LOAD_PROGRESS_CEILING`] once more at the end.
  /// Images that fail to load are logged and replaced by placeholders of the
  /// configured frame size.
  ///
  /// If the plan cannot be built, or the returned future is dropped before
  /// completion, the loader goes back to [`LoadState::NotStarted`] so the load
  /// can be retried.
  #[instrument(name = "sequence_load", skip(self, notifier))]
  pub async fn load(&self, notifier: &dyn ProgressNotifier) -> Result<LoadOutcome, LoaderError> {
    {
      let mut inner = self.lock();
      match inner.state {
        LoadState::Loading => return Ok(LoadOutcome::AlreadyLoading),
        LoadState::Loaded => return Ok(LoadOutcome::AlreadyLoaded),
        LoadState::NotStarted => {}
      }
      inner.state = LoadState::Loading;
      inner.progress = 0;
    }
    let guard = LoadingGuard {
      inner: &self.inner,
      armed: true,
    };

    let load_id = uuid::Uuid::new_v4().to_string();

    let plan = match self.build_plan() {
      Ok(plan) => plan,
      Err(e) => {
        error!(load_id = %load_id, error = %e, "sequence_load_failed");
        return Err(e);
      }
    };

    info!(
      load_id = %load_id,
      total = plan.len(),
      "sequence_load_started"
    );

    let frames = self.fetch_all(&plan, &load_id, notifier).await;
    let total = frames.len();
    let placeholders = frames.iter().filter(|f| f.is_placeholder()).count();

    {
      let mut inner = self.lock();
      inner.frames = frames;
      inner.plan = Some(Arc::new(plan));
      inner.state = LoadState::Loaded;
      inner.progress = LOAD_PROGRESS_CEILING;
    }
    guard.disarm();
    notifier.notify(LOAD_PROGRESS_CEILING);

    info!(
      load_id = %load_id,
      total,
      placeholders,
      "sequence_load_completed"
    );

    Ok(LoadOutcome::Completed {
      total,
      placeholders,
    })
  }

  /// Fetch every plan entry concurrently, capturing each result in place.
  async fn fetch_all(
    &self,
    plan: &ResourcePlan,
    load_id: &str,
    notifier: &dyn ProgressNotifier,
  ) -> Vec<Frame> {
    let total = plan.len();
    let mut slots: Vec<Option<Frame>> = vec![None; total];
    let mut completed = 0usize;

    let mut pending: FuturesUnordered<_> = plan
      .entries()
      .iter()
      .map(|entry| async move { (entry, self.fetcher.fetch(&entry.source).await) })
      .collect();

    while let Some((entry, result)) = pending.next().await {
      slots[entry.position] = Some(match result {
        Ok(image) => {
          debug!(
            load_id = %load_id,
            position = entry.position,
            key = %entry.key,
            bytes = image.bytes.len(),
            "image_loaded"
          );
          Frame::Loaded(image)
        }
        Err(e) => {
          warn!(
            load_id = %load_id,
            position = entry.position,
            source = %entry.source,
            error = %e,
            "image_load_failed"
          );
          self.placeholder()
        }
      });

      completed += 1;
      let progress = progress_for(completed, total);
      self.lock().progress = progress;
      notifier.notify(progress);
    }

    slots
      .into_iter()
      .map(|slot| slot.unwrap_or_else(|| self.placeholder()))
      .collect()
  }

  fn placeholder(&self) -> Frame {
    Frame::Placeholder {
      width: self.config.frame_width,
      height: self.config.frame_height,
    }
  }
}

impl<F> SequenceLoader<F> {
  fn lock(&self) -> MutexGuard<'_, LoaderInner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn state(&self) -> LoadState {
    self.lock().state
  }

  pub fn is_loading(&self) -> bool {
    self.state() == LoadState::Loading
  }

  pub fn is_loaded(&self) -> bool {
    self.state() == LoadState::Loaded
  }

  /// Current progress, 0 to [`LOAD_PROGRESS_CEILING`].
  pub fn loading_progress(&self) -> u8 {
    self.lock().progress
  }

  /// Frame at `index`, or `None` when out of range (including before load).
  pub fn get_image(&self, index: usize) -> Option<Frame> {
    self.lock().frames.get(index).cloned()
  }

  /// Number of loaded frames; 0 until the load completes.
  pub fn total_images(&self) -> usize {
    self.lock().frames.len()
  }

  /// Plan used by the completed load.
  pub fn plan(&self) -> Option<Arc<ResourcePlan>> {
    self.lock().plan.clone()
  }

  /// Plan entry and frame at `index`.
  pub fn entry(&self, index: usize) -> Option<(PlanEntry, Frame)> {
    let inner = self.lock();
    let entry = inner.plan.as_ref()?.get(index)?.clone();
    let frame = inner.frames.get(index)?.clone();
    Some((entry, frame))
  }
}

/// `floor(completed / total * ceiling)`, computed exactly.
fn progress_for(completed: usize, total: usize) -> u8 {
  if total == 0 {
    return LOAD_PROGRESS_CEILING;
  }
  let ceiling = usize::from(LOAD_PROGRESS_CEILING);
  (completed.min(total) * ceiling / total) as u8
}

/// Returns the loader to `NotStarted` unless the load ran to completion.
struct LoadingGuard<'a> {
  inner: &'a Mutex<LoaderInner>,
  armed: bool,
}

impl LoadingGuard<'_> {
  fn disarm(mut self) {
    self.armed = false;
  }
}

impl Drop for LoadingGuard<'_> {
  fn drop(&mut self) {
    if !self.armed {
      return;
    }
    let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    inner.state = LoadState::NotStarted;
    inner.progress = 0;
    inner.frames.clear();
    inner.plan = None;
  }
}
