use crate::CameraError;
use facegate_base::Tensor;

/// Something that can hand out a live video stream, such as a camera.
///
/// Requesting a stream is where access is granted or refused; failures are
/// reported as [`CameraError::PermissionDenied`], [`CameraError::NotFound`]
/// or [`CameraError::Device`].
#[allow(async_fn_in_trait)]
pub trait MediaCaptureDevice {
    type Stream: VideoStream;

    /// Open the device and start playback.
    async fn request_stream(&self) -> Result<Self::Stream, CameraError>;
}

/// A running video stream. Dropping it stops playback and releases the device.
pub trait VideoStream {
    /// Copy of the frame currently shown by the stream.
    ///
    /// `None` until the stream has produced its first frame.
    fn current_frame(&self) -> Option<Tensor<u8>>;
}
