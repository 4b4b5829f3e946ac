use std::io::Cursor;
use std::sync::Arc;

use crate::{DecodedImage, FetchError};

/// Decode encoded image bytes (any format the `image` crate recognises) into
/// straight RGBA8.
///
/// `source_path` is only used for error reporting.
pub fn decode_image(source_path: &str, bytes: &[u8]) -> Result<DecodedImage, FetchError> {
  let dyn_img = image::load_from_memory(bytes).map_err(|e| FetchError::Decode {
    source_path: source_path.to_string(),
    message: e.to_string(),
  })?;
  let rgba = dyn_img.to_rgba8();
  let (width, height) = rgba.dimensions();

  Ok(DecodedImage {
    width,
    height,
    rgba8: Arc::new(rgba.into_raw()),
  })
}

/// Read the width and height from the image header without decoding pixels.
pub fn read_dimensions(source_path: &str, bytes: &[u8]) -> Result<(u32, u32), FetchError> {
  let decode_error = |message: String| FetchError::Decode {
    source_path: source_path.to_string(),
    message,
  };

  image::ImageReader::new(Cursor::new(bytes))
    .with_guessed_format()
    .map_err(|e| decode_error(e.to_string()))?
    .into_dimensions()
    .map_err(|e| decode_error(e.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::EncodedImage;

  fn encode_png(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
      .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
      .unwrap();
    buf
  }

  #[test]
  fn test_decode_png_dimensions_and_pixels() {
    let bytes = encode_png(3, 2, [10, 20, 30, 128]);
    let decoded = decode_image("frame.png", &bytes).unwrap();

    assert_eq!(decoded.width, 3);
    assert_eq!(decoded.height, 2);
    assert_eq!(decoded.rgba8.len(), 3 * 2 * 4);
    assert_eq!(&decoded.rgba8[..4], &[10, 20, 30, 128]);
  }

  #[test]
  fn test_decode_garbage_is_an_error() {
    let err = decode_image("broken.webp", b"not an image").unwrap_err();
    match err {
      FetchError::Decode { source_path, .. } => assert_eq!(source_path, "broken.webp"),
      other => panic!("expected Decode error, got {:?}", other),
    }
  }

  #[test]
  fn test_read_dimensions_from_header() {
    let bytes = encode_png(7, 5, [0, 0, 0, 255]);
    assert_eq!(read_dimensions("frame.png", &bytes).unwrap(), (7, 5));
  }

  #[test]
  fn test_read_dimensions_of_garbage_is_an_error() {
    let err = read_dimensions("broken.webp", b"not an image").unwrap_err();
    assert!(matches!(err, FetchError::Decode { ref source_path, .. } if source_path == "broken.webp"));
  }

  #[test]
  fn test_encoded_image_decodes_on_demand() {
    let bytes = encode_png(3, 2, [9, 8, 7, 255]);
    let encoded = EncodedImage::from_bytes("frame.png", bytes.clone().into()).unwrap();

    assert_eq!((encoded.width, encoded.height), (3, 2));
    assert_eq!(&encoded.bytes[..], &bytes[..]);

    let decoded = encoded.decode().unwrap();
    assert_eq!((decoded.width, decoded.height), (3, 2));
    assert_eq!(&decoded.rgba8[..4], &[9, 8, 7, 255]);
  }

  #[test]
  fn test_blank_image_size() {
    let blank = DecodedImage::blank(4, 3);
    assert_eq!(blank.rgba8.len(), 48);
    assert!(blank.rgba8.iter().all(|b| *b == 0));
  }
}
