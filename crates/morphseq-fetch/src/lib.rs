//! morphseq Fetch
//!
//! This crate provides the image fetcher trait and implementations for
//! morphseq. A fetcher turns a plan entry's source path into an
//! [`EncodedImage`]: the file's bytes plus the dimensions from its header.
//! Pixels are only produced when a caller asks for them with
//! [`EncodedImage::decode`].
//!
//! The [`Fetcher`] trait defines the host layer for image loading.
//! Implementations handle the actual retrieval (filesystem, network, in-memory
//! fakes for tests) while the loader decides ordering, progress, and what to
//! do with failures.
//!
//! The loader issues every fetch of a sequence at once, so implementations
//! must tolerate many concurrent calls and resolve each call exactly once.

mod decode;
mod fs;

pub use decode::{decode_image, read_dimensions};
pub use fs::FsFetcher;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

/// An image as fetched: still encoded, with its size read from the header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
  /// Source path the bytes were fetched from.
  pub source: String,
  pub width: u32,
  pub height: u32,
  pub bytes: Bytes,
}

impl EncodedImage {
  pub fn new(source: impl Into<String>, width: u32, height: u32, bytes: impl Into<Bytes>) -> Self {
    Self {
      source: source.into(),
      width,
      height,
      bytes: bytes.into(),
    }
  }

  /// Read the header of `bytes` and keep them encoded.
  pub fn from_bytes(source: impl Into<String>, bytes: Bytes) -> Result<Self, FetchError> {
    let source = source.into();
    let (width, height) = read_dimensions(&source, &bytes)?;
    Ok(Self {
      source,
      width,
      height,
      bytes,
    })
  }

  /// Decode the bytes to straight RGBA8.
  pub fn decode(&self) -> Result<DecodedImage, FetchError> {
    decode_image(&self.source, &self.bytes)
  }
}

/// A decoded image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
  pub width: u32,
  pub height: u32,
  /// Straight RGBA8, row-major, tightly packed.
  pub rgba8: Arc<Vec<u8>>,
}

impl DecodedImage {
  /// A fully transparent image of the given size.
  pub fn blank(width: u32, height: u32) -> Self {
    Self {
      width,
      height,
      rgba8: Arc::new(vec![0; width as usize * height as usize * 4]),
    }
  }
}

/// Error type for fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
  /// The requested source does not exist.
  #[error("image not found: {0}")]
  NotFound(String),

  /// An I/O error occurred while reading the source.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The source path escapes the fetcher's root.
  #[error("invalid image source: {0}")]
  InvalidSource(String),

  /// The source was read but could not be decoded.
  #[error("failed to decode '{source_path}': {message}")]
  Decode {
    source_path: String,
    message: String,
  },
}

/// Image fetcher trait.
///
/// Implementations provide the actual image source. The loader passes each
/// plan entry's relative source path and awaits exactly one result per call.
#[async_trait]
pub trait Fetcher: Send + Sync {
  /// Fetch the image at `source` without decoding its pixels.
  async fn fetch(&self, source: &str) -> Result<EncodedImage, FetchError>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
  async fn fetch(&self, source: &str) -> Result<EncodedImage, FetchError> {
    (**self).fetch(source).await
  }
}
