use crate::{CameraError, MediaCaptureDevice, VideoStream};
use facegate_base::Tensor;
use std::path::{Path, PathBuf};

/// A capture device backed by an image file.
///
/// Every frame of its stream is the decoded file. Used for headless runs and
/// for machines without a camera.
#[derive(Debug, Clone)]
pub struct StillImageDevice {
    path: PathBuf,
}

impl StillImageDevice {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug)]
pub struct StillImageStream {
    frame: Tensor<u8>,
}

impl MediaCaptureDevice for StillImageDevice {
    type Stream = StillImageStream;

    async fn request_stream(&self) -> Result<StillImageStream, CameraError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let frame = tokio::task::spawn_blocking(move || facegate_image::decode_rgb(&bytes))
            .await
            .map_err(|e| CameraError::Device(e.to_string()))??;

        let (width, height, _) = frame
            .image_dims()
            .map_err(|e| CameraError::Stream(e.to_string()))?;
        log::info!(
            "still image {} opened: {}x{}",
            self.path.display(),
            width,
            height
        );
        Ok(StillImageStream { frame })
    }
}

impl VideoStream for StillImageStream {
    fn current_frame(&self) -> Option<Tensor<u8>> {
        Some(self.frame.clone())
    }
}
