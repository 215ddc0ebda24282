use std::fmt;
use std::io;

#[derive(Debug)]
pub enum CameraError {
    /// The user or the OS refused access to the device.
    PermissionDenied(String),
    /// No capture device at the requested location.
    NotFound(String),
    Device(String),
    Stream(String),
    Decode(facegate_image::ImageError),
}

impl CameraError {
    /// Whether this error means the stream could never be acquired,
    /// as opposed to a fault in an already running stream.
    pub fn is_access_error(&self) -> bool {
        matches!(
            self,
            CameraError::PermissionDenied(_) | CameraError::NotFound(_) | CameraError::Device(_)
        )
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::PermissionDenied(msg) => write!(f, "permission denied: {msg}"),
            CameraError::NotFound(msg) => write!(f, "no capture device: {msg}"),
            CameraError::Device(msg) => write!(f, "device error: {msg}"),
            CameraError::Stream(msg) => write!(f, "stream error: {msg}"),
            CameraError::Decode(err) => write!(f, "frame error: {err}"),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<io::Error> for CameraError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => CameraError::PermissionDenied(err.to_string()),
            io::ErrorKind::NotFound => CameraError::NotFound(err.to_string()),
            _ => CameraError::Device(err.to_string()),
        }
    }
}

impl From<facegate_image::ImageError> for CameraError {
    fn from(err: facegate_image::ImageError) -> Self {
        CameraError::Decode(err)
    }
}
