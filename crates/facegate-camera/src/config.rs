use std::path::{Path, PathBuf};

/// How to open the camera.
///
/// Width, height and frame rate are requests; the driver may pick the
/// closest mode it supports, and captured frames carry the real size.
#[derive(Clone, Debug)]
pub struct CameraConfig {
    device: PathBuf,
    width: u32,
    height: u32,
    fps: u32,
    buffer_count: u32,
    prefer_mjpeg: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from("/dev/video0"),
            width: 640,
            height: 480,
            fps: 30,
            buffer_count: 4,
            prefer_mjpeg: true,
        }
    }
}

impl CameraConfig {
    pub fn with_device(mut self, device: impl Into<PathBuf>) -> Self {
        self.device = device.into();
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Number of mmap buffers queued with the driver.
    pub fn with_buffer_count(mut self, buffer_count: u32) -> Self {
        self.buffer_count = buffer_count;
        self
    }

    /// Ask for MJPEG before falling back to raw YUYV. Raw capture avoids
    /// a decode per frame but costs USB bandwidth at larger sizes.
    pub fn with_mjpeg(mut self, prefer_mjpeg: bool) -> Self {
        self.prefer_mjpeg = prefer_mjpeg;
        self
    }

    // Getters
    pub fn device(&self) -> &Path {
        &self.device
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn buffer_count(&self) -> u32 {
        self.buffer_count
    }

    pub fn prefer_mjpeg(&self) -> bool {
        self.prefer_mjpeg
    }
}
