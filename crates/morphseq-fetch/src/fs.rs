use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::BytesMut;
use futures::StreamExt;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::{EncodedImage, FetchError, Fetcher};

/// Filesystem-based image fetcher.
///
/// Reads images from the local filesystem. Each source is read from
/// `{root}/{source}`:
/// ```text
/// {root}/
/// ├── 0.webp
/// ├── 01.webp
/// └── morphing/
///     └── 01/
///         ├── 01-001.webp
///         └── 01-002.webp
/// ```
/// Only the image header is parsed at fetch time. Sources containing `..`
/// are rejected.
pub struct FsFetcher {
  root: PathBuf,
}

impl FsFetcher {
  /// Create a new filesystem fetcher with the given root path.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Get the root directory of the fetcher.
  pub fn root(&self) -> &Path {
    &self.root
  }

  fn source_to_path(&self, source: &str) -> Result<PathBuf, FetchError> {
    let relative = Path::new(source.trim_start_matches('/'));
    if relative
      .components()
      .any(|c| matches!(c, Component::ParentDir))
    {
      return Err(FetchError::InvalidSource(source.to_string()));
    }
    Ok(self.root.join(relative))
  }

  async fn read_all(&self, source: &str) -> Result<BytesMut, FetchError> {
    let path = self.source_to_path(source)?;
    let file = File::open(&path).await.map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        FetchError::NotFound(source.to_string())
      } else {
        FetchError::Io(e)
      }
    })?;

    let mut buf = BytesMut::new();
    let mut stream = ReaderStream::new(file);
    while let Some(chunk) = stream.next().await {
      buf.extend_from_slice(&chunk?);
    }
    Ok(buf)
  }
}

#[async_trait]
impl Fetcher for FsFetcher {
  async fn fetch(&self, source: &str) -> Result<EncodedImage, FetchError> {
    let bytes = self.read_all(source).await?.freeze();
    debug!(source = %source, bytes = bytes.len(), "image read");

    EncodedImage::from_bytes(source, bytes)
  }
}
