//! JPEG encoding and image decoding for captured frames.
//!
//! Frames are `Tensor<u8>` in HWC layout: `[height, width, channels]`.

pub mod error;

pub use error::ImageError;

use crates_image::{ExtendedColorType, ImageEncoder, codecs::jpeg::JpegEncoder};
use facegate_base::Tensor;

/// Quality used for verification uploads.
pub const CAPTURE_JPEG_QUALITY: u8 = 95;

/// Decodes any supported image (JPEG, PNG, BMP) into an RGB `[h, w, 3]` tensor.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is invalid or the format is unsupported.
pub fn decode_rgb(data: &[u8]) -> Result<Tensor<u8>, ImageError> {
    let rgb = crates_image::load_from_memory(data)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Tensor::image(
        width as usize,
        height as usize,
        3,
        rgb.into_raw(),
    )?)
}

/// Encodes an HWC tensor as JPEG on the current thread.
///
/// Grayscale (1 channel) and RGB (3 channels) are encoded as-is; a fourth
/// alpha channel is dropped.
///
/// # Errors
///
/// Returns `ImageError::Empty` for zero-sized images,
/// `ImageError::UnsupportedChannels` for channel counts other than 1, 3 or 4,
/// and `ImageError::Encode` when the encoder fails.
pub fn encode_jpeg_blocking(image: &Tensor<u8>, quality: u8) -> Result<Vec<u8>, ImageError> {
    let (width, height, channels) = image.image_dims()?;
    if width == 0 || height == 0 {
        return Err(ImageError::Empty { width, height });
    }

    let stripped;
    let (pixels, color_type) = match channels {
        1 => (image.data.as_slice(), ExtendedColorType::L8),
        3 => (image.data.as_slice(), ExtendedColorType::Rgb8),
        4 => {
            stripped = image
                .data
                .chunks_exact(4)
                .flat_map(|c| &c[..3])
                .copied()
                .collect::<Vec<u8>>();
            (stripped.as_slice(), ExtendedColorType::Rgb8)
        }
        _ => return Err(ImageError::UnsupportedChannels(channels)),
    };

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(pixels, width as u32, height as u32, color_type)
        .map_err(|e| ImageError::Encode(e.to_string()))?;

    Ok(buffer)
}

/// Encodes an HWC tensor as JPEG.
///
/// The CPU-bound encoding work runs on tokio's blocking thread pool so the
/// interaction loop keeps running while a frame is serialized.
///
/// # Errors
///
/// See [`encode_jpeg_blocking`].
pub async fn encode_jpeg(image: Tensor<u8>, quality: u8) -> Result<Vec<u8>, ImageError> {
    tokio::task::spawn_blocking(move || encode_jpeg_blocking(&image, quality))
        .await
        .map_err(|e| ImageError::Encode(e.to_string()))?
}
