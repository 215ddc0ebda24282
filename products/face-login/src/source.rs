use facegate_base::Tensor;
use facegate_camera::{
    CameraConfig, CameraError, MediaCaptureDevice, StillImageDevice, StillImageStream, VideoStream,
};
use std::path::PathBuf;

#[cfg(feature = "v4l2")]
use facegate_camera::{V4l2Device, V4l2Stream};

/// Where frames come from: a live camera or an image file.
#[derive(Debug)]
pub enum CaptureSource {
    #[cfg(feature = "v4l2")]
    Camera(V4l2Device),
    Still(StillImageDevice),
}

#[derive(Debug)]
pub enum SourceStream {
    #[cfg(feature = "v4l2")]
    Camera(V4l2Stream),
    Still(StillImageStream),
}

impl CaptureSource {
    /// Pick the still image when one is given, the camera otherwise.
    pub fn select(camera: CameraConfig, image: Option<PathBuf>) -> Result<Self, CameraError> {
        if let Some(path) = image {
            return Ok(CaptureSource::Still(StillImageDevice::new(path)));
        }
        Self::camera(camera)
    }

    #[cfg(feature = "v4l2")]
    fn camera(config: CameraConfig) -> Result<Self, CameraError> {
        Ok(CaptureSource::Camera(V4l2Device::new(config)))
    }

    #[cfg(not(feature = "v4l2"))]
    fn camera(config: CameraConfig) -> Result<Self, CameraError> {
        Err(CameraError::NotFound(format!(
            "{}: built without camera support, use --image",
            config.device().display()
        )))
    }
}

impl MediaCaptureDevice for CaptureSource {
    type Stream = SourceStream;

    async fn request_stream(&self) -> Result<SourceStream, CameraError> {
        match self {
            #[cfg(feature = "v4l2")]
            CaptureSource::Camera(device) => device.request_stream().await.map(SourceStream::Camera),
            CaptureSource::Still(device) => device.request_stream().await.map(SourceStream::Still),
        }
    }
}

impl VideoStream for SourceStream {
    fn current_frame(&self) -> Option<Tensor<u8>> {
        match self {
            #[cfg(feature = "v4l2")]
            SourceStream::Camera(stream) => stream.current_frame(),
            SourceStream::Still(stream) => stream.current_frame(),
        }
    }
}
