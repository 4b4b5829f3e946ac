use morphseq_fetch::{DecodedImage, EncodedImage, FetchError};

/// One loaded position of a sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
  /// The image loaded. Only the encoded bytes are kept; pixels come from
  /// [`Frame::decode`].
  Loaded(EncodedImage),
  /// The image failed to load. Carries the nominal frame size so consumers
  /// can lay it out like any other frame.
  Placeholder { width: u32, height: u32 },
}

impl Frame {
  pub fn width(&self) -> u32 {
    match self {
      Frame::Loaded(image) => image.width,
      Frame::Placeholder { width, .. } => *width,
    }
  }

  pub fn height(&self) -> u32 {
    match self {
      Frame::Loaded(image) => image.height,
      Frame::Placeholder { height, .. } => *height,
    }
  }

  pub fn is_placeholder(&self) -> bool {
    matches!(self, Frame::Placeholder { .. })
  }

  /// Encoded bytes, if the image loaded.
  pub fn encoded(&self) -> Option<&EncodedImage> {
    match self {
      Frame::Loaded(image) => Some(image),
      Frame::Placeholder { .. } => None,
    }
  }

  /// Decode the frame to RGBA8. A placeholder decodes to a transparent
  /// image of its nominal size.
  pub fn decode(&self) -> Result<DecodedImage, FetchError> {
    match self {
      Frame::Loaded(image) => image.decode(),
      Frame::Placeholder { width, height } => Ok(DecodedImage::blank(*width, *height)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_loaded_frame() {
    let frame = Frame::Loaded(EncodedImage::new("a.webp", 3, 2, b"RIFF".to_vec()));
    assert_eq!(frame.width(), 3);
    assert_eq!(frame.height(), 2);
    assert!(!frame.is_placeholder());
    assert_eq!(&frame.encoded().unwrap().bytes[..], b"RIFF");
  }

  #[test]
  fn test_loaded_frame_with_bad_bytes_fails_to_decode() {
    let frame = Frame::Loaded(EncodedImage::new("a.webp", 3, 2, b"RIFF".to_vec()));
    let err = frame.decode().unwrap_err();
    assert!(matches!(err, FetchError::Decode { ref source_path, .. } if source_path == "a.webp"));
  }

  #[test]
  fn test_placeholder_frame() {
    let frame = Frame::Placeholder {
      width: 2366,
      height: 1318,
    };
    assert_eq!(frame.width(), 2366);
    assert_eq!(frame.height(), 1318);
    assert!(frame.is_placeholder());
    assert!(frame.encoded().is_none());

    let blank = frame.decode().unwrap();
    assert_eq!((blank.width, blank.height), (2366, 1318));
  }
}
