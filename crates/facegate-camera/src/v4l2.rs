use crate::convert::yuyv_to_rgb;
use crate::surface::{FramePublisher, FrameSurface, frame_surface};
use crate::{CameraConfig, CameraError, MediaCaptureDevice, VideoStream};
use facegate_base::Tensor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::oneshot;
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

// longest wait for one frame before the capture thread rechecks `cancel`;
// also bounds how long dropping a stream blocks on a stalled camera
const FRAME_TIMEOUT: Duration = Duration::from_millis(500);

/// Pixel format negotiated when the device is opened.
#[derive(Debug, Clone, Copy)]
enum CaptureFormat {
    Mjpeg,
    Yuyv { width: u32, height: u32 },
}

/// V4L2 capture device.
///
/// Nothing is opened until [`MediaCaptureDevice::request_stream`] is called;
/// each call opens the device again and yields an independent stream.
#[derive(Debug, Clone)]
pub struct V4l2Device {
    config: CameraConfig,
}

/// Running V4L2 stream.
///
/// A background thread pulls frames from the driver, decodes them to RGB and
/// publishes the latest one. Dropping the stream stops and joins the thread.
pub struct V4l2Stream {
    surface: FrameSurface,
    cancel: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for V4l2Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Stream")
            .field("dimensions", &self.surface.dimensions())
            .field("thread_handle", &self.thread_handle.is_some())
            .finish()
    }
}

impl V4l2Device {
    pub fn new(config: CameraConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }
}

impl MediaCaptureDevice for V4l2Device {
    type Stream = V4l2Stream;

    async fn request_stream(&self) -> Result<V4l2Stream, CameraError> {
        let config = self.config.clone();
        let (publisher, surface) = frame_surface();
        let cancel = Arc::new(AtomicBool::new(false));

        // The device is opened on the capture thread itself; the outcome of
        // opening is reported back before any frame is produced.
        let (init_tx, init_rx) = oneshot::channel::<Result<(), CameraError>>();

        let thread_handle = thread::Builder::new()
            .name("v4l2-capture".to_string())
            .spawn({
                let cancel = Arc::clone(&cancel);
                move || {
                    let (device, format) = match open_device(&config) {
                        Ok(opened) => opened,
                        Err(e) => {
                            let _ = init_tx.send(Err(e));
                            return;
                        }
                    };
                    let mut stream = match MmapStream::with_buffers(
                        &device,
                        Type::VideoCapture,
                        config.buffer_count(),
                    ) {
                        Ok(stream) => stream,
                        Err(e) => {
                            let _ = init_tx.send(Err(e.into()));
                            return;
                        }
                    };
                    stream.set_timeout(FRAME_TIMEOUT);
                    let _ = init_tx.send(Ok(()));

                    if let Err(e) = capture_loop(stream, format, &publisher, &cancel) {
                        log::error!("v4l2 capture loop stopped: {e}");
                    }
                }
            })?;

        init_rx
            .await
            .map_err(|_| CameraError::Device("capture thread died during init".to_string()))??;

        log::info!(
            "camera {} opened: requested {}x{} @ {} fps",
            self.config.device().display(),
            self.config.width(),
            self.config.height(),
            self.config.fps()
        );

        Ok(V4l2Stream {
            surface,
            cancel,
            thread_handle: Some(thread_handle),
        })
    }
}

impl VideoStream for V4l2Stream {
    fn current_frame(&self) -> Option<Tensor<u8>> {
        self.surface.snapshot()
    }
}

impl Drop for V4l2Stream {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        // the thread notices within one FRAME_TIMEOUT, even without frames
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

/// Open the device and negotiate the preferred of MJPEG and YUYV, falling
/// back to the other one.
fn open_device(config: &CameraConfig) -> Result<(Device, CaptureFormat), CameraError> {
    let device = Device::with_path(config.device())?;

    let mjpeg = FourCC::new(b"MJPG");
    let yuyv = FourCC::new(b"YUYV");

    let request = |fourcc| Format::new(config.width(), config.height(), fourcc);
    let mut actual = if config.prefer_mjpeg() {
        Capture::set_format(&device, &request(mjpeg))?
    } else {
        Capture::set_format(&device, &request(yuyv))?
    };
    if actual.fourcc != mjpeg && actual.fourcc != yuyv {
        let fallback = if config.prefer_mjpeg() { yuyv } else { mjpeg };
        actual = Capture::set_format(&device, &request(fallback))?;
    }

    let format = if actual.fourcc == mjpeg {
        CaptureFormat::Mjpeg
    } else if actual.fourcc == yuyv {
        // the driver may have adjusted the resolution
        CaptureFormat::Yuyv {
            width: actual.width,
            height: actual.height,
        }
    } else {
        return Err(CameraError::Device(format!(
            "no supported pixel format (tried MJPEG and YUYV, got {})",
            actual.fourcc
        )));
    };

    let params = v4l::video::capture::Parameters::with_fps(config.fps());
    Capture::set_params(&device, &params)?;

    log::debug!(
        "negotiated {:?} at {}x{}",
        format,
        actual.width,
        actual.height
    );
    Ok((device, format))
}

fn decode_frame(data: &[u8], format: CaptureFormat) -> Result<Tensor<u8>, CameraError> {
    match format {
        CaptureFormat::Mjpeg => Ok(facegate_image::decode_rgb(data)?),
        CaptureFormat::Yuyv { width, height } => {
            let rgb = yuyv_to_rgb(data, width, height).ok_or_else(|| {
                CameraError::Stream(format!(
                    "YUYV frame too short: got {} bytes for {}x{}",
                    data.len(),
                    width,
                    height
                ))
            })?;
            Tensor::image(width as usize, height as usize, 3, rgb)
                .map_err(|e| CameraError::Stream(e.to_string()))
        }
    }
}

fn capture_loop(
    mut stream: MmapStream<'_>,
    format: CaptureFormat,
    publisher: &FramePublisher,
    cancel: &AtomicBool,
) -> Result<(), CameraError> {
    while !cancel.load(Ordering::Relaxed) {
        let (data, _metadata) = match CaptureStream::next(&mut stream) {
            Ok(frame) => frame,
            Err(e) if is_stall(&e) => {
                log::debug!("no frame within {FRAME_TIMEOUT:?}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        // corrupt MJPEG frames happen; skip them and keep streaming
        let frame = match decode_frame(data, format) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("dropping undecodable frame: {e}");
                continue;
            }
        };

        if !publisher.publish(frame) {
            break;
        }
    }
    Ok(())
}

fn is_stall(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
    )
}
