use facegate_base::TensorError;
use std::fmt;

#[derive(Debug)]
pub enum ImageError {
    /// Input bytes are not a readable image.
    Decode(String),
    /// The JPEG encoder (or its worker thread) failed.
    Encode(String),
    /// Nothing to encode: one of the dimensions is zero.
    Empty { width: usize, height: usize },
    UnsupportedChannels(usize),
    Layout(TensorError),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Decode(msg) => write!(f, "cannot decode image: {msg}"),
            ImageError::Encode(msg) => write!(f, "jpeg encoding failed: {msg}"),
            ImageError::Empty { width, height } => {
                write!(f, "cannot encode an empty {width}x{height} image")
            }
            ImageError::UnsupportedChannels(n) => write!(f, "unsupported channel count: {n}"),
            ImageError::Layout(err) => write!(f, "bad frame layout: {err}"),
        }
    }
}

impl std::error::Error for ImageError {}

impl From<crates_image::ImageError> for ImageError {
    fn from(err: crates_image::ImageError) -> Self {
        ImageError::Decode(err.to_string())
    }
}

impl From<TensorError> for ImageError {
    fn from(err: TensorError) -> Self {
        ImageError::Layout(err)
    }
}
