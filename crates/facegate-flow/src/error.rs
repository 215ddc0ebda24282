use facegate_camera::CameraError;
use facegate_image::ImageError;
use std::fmt;

/// Failures of the local half of the flow, before or instead of a verdict.
#[derive(Debug)]
pub enum FlowError {
    /// The camera could not be opened, or no stream is held.
    DeviceAccess(CameraError),
    /// The stream has not produced a usable frame yet.
    DeviceNotReady(String),
    Encode(ImageError),
    EmptyFrame,
    /// Another acquisition or capture is in progress.
    Busy,
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::DeviceAccess(err) => write!(f, "camera unavailable: {err}"),
            FlowError::DeviceNotReady(msg) => write!(f, "camera not ready: {msg}"),
            FlowError::Encode(err) => write!(f, "{err}"),
            FlowError::EmptyFrame => write!(f, "captured image is empty"),
            FlowError::Busy => write!(f, "a capture is already in progress"),
        }
    }
}

impl std::error::Error for FlowError {}

impl From<CameraError> for FlowError {
    fn from(err: CameraError) -> Self {
        FlowError::DeviceAccess(err)
    }
}

impl From<ImageError> for FlowError {
    fn from(err: ImageError) -> Self {
        FlowError::Encode(err)
    }
}
