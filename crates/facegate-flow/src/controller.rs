use crate::status::messages;
use crate::{FlowError, Navigator, StatusSurface, Tone};
use facegate_camera::{CameraError, MediaCaptureDevice, VideoStream};
use facegate_image::CAPTURE_JPEG_QUALITY;
use facegate_verify::{CapturedFrame, VerificationEndpoint, VerificationResult};
use std::cell::{Cell, RefCell};

/// UI state of the flow.
///
/// `Idle → Acquiring → Ready → Capturing → Submitting → Succeeded`, with
/// `Failed` passing straight back to `Ready` so the user can try again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Acquiring,
    Ready,
    Capturing,
    Submitting,
    Succeeded,
    Failed,
}

/// What a trigger press led to.
#[derive(Debug)]
pub enum TriggerOutcome {
    /// A sequence was already in flight, or verification already succeeded.
    Ignored,
    /// The frame never reached the endpoint.
    Aborted(FlowError),
    Completed(VerificationResult),
}

/// An acquired camera stream.
///
/// The stream is the rendering surface frames are grabbed from; dropping the
/// session releases the device.
struct CaptureSession<S> {
    stream: S,
}

/// Drives camera acquisition, capture, upload and the resulting UI changes.
///
/// Built for a single-threaded event loop: methods take `&self`, and the busy
/// flag keeps at most one acquisition or capture-and-upload in flight.
pub struct CaptureFlowController<D: MediaCaptureDevice, E, S, N> {
    device: D,
    endpoint: E,
    status: S,
    navigator: N,
    session: RefCell<Option<CaptureSession<D::Stream>>>,
    state: Cell<FlowState>,
    busy: Cell<bool>,
}

/// Clears the busy flag when a sequence ends, however it ends.
struct BusyGuard<'a> {
    busy: &'a Cell<bool>,
    state: &'a Cell<FlowState>,
    status: &'a dyn StatusSurface,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.set(false);
        // after success the flow has moved on; the trigger stays off
        if self.state.get() != FlowState::Succeeded {
            self.status.set_trigger_enabled(true);
        }
    }
}

impl<D, E, S, N> CaptureFlowController<D, E, S, N>
where
    D: MediaCaptureDevice,
    E: VerificationEndpoint,
    S: StatusSurface,
    N: Navigator,
{
    pub fn new(device: D, endpoint: E, status: S, navigator: N) -> Self {
        Self {
            device,
            endpoint,
            status,
            navigator,
            session: RefCell::new(None),
            state: Cell::new(FlowState::Idle),
            busy: Cell::new(false),
        }
    }

    pub fn state(&self) -> FlowState {
        self.state.get()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    pub fn has_session(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    fn set_state(&self, next: FlowState) {
        let previous = self.state.replace(next);
        if previous != next {
            log::debug!("flow state {previous:?} -> {next:?}");
        }
    }

    /// Where to rest after an attempt that did not succeed.
    fn settle(&self) {
        if self.has_session() {
            self.set_state(FlowState::Ready);
        } else {
            self.set_state(FlowState::Idle);
        }
    }

    fn begin_busy(&self) -> Option<BusyGuard<'_>> {
        if self.busy.replace(true) {
            return None;
        }
        self.status.set_trigger_enabled(false);
        Some(BusyGuard {
            busy: &self.busy,
            state: &self.state,
            status: &self.status,
        })
    }

    /// Request the camera and start playback.
    ///
    /// Any stream already held is released first. On failure the reason is
    /// shown as an error and the trigger stays enabled; nothing is retried.
    pub async fn acquire_device(&self) -> Result<(), FlowError> {
        let Some(_guard) = self.begin_busy() else {
            return Err(FlowError::Busy);
        };

        // give the device back before asking for it again
        self.session.borrow_mut().take();
        self.set_state(FlowState::Acquiring);
        self.status.show(messages::ACQUIRING, Tone::Neutral);

        match self.device.request_stream().await {
            Ok(stream) => {
                *self.session.borrow_mut() = Some(CaptureSession { stream });
                self.set_state(FlowState::Ready);
                self.status.show("", Tone::Neutral);
                log::info!("camera stream acquired");
                Ok(())
            }
            Err(e) => {
                log::error!("error accessing camera: {e}");
                self.status
                    .show(&format!("{} {e}", messages::ACCESS_DENIED), Tone::Error);
                self.set_state(FlowState::Idle);
                Err(FlowError::DeviceAccess(e))
            }
        }
    }

    /// Grab the frame the stream is showing and encode it as JPEG.
    ///
    /// Exactly one frame per call, at the stream's native resolution.
    pub async fn capture_frame(&self) -> Result<CapturedFrame, FlowError> {
        let raster = {
            let session = self.session.borrow();
            let session = session.as_ref().ok_or_else(|| {
                FlowError::DeviceAccess(CameraError::Device(
                    "no camera stream is open".to_string(),
                ))
            })?;
            session
                .stream
                .current_frame()
                .ok_or_else(|| FlowError::DeviceNotReady("no frame received yet".to_string()))?
        };

        let (width, height, _) = raster
            .image_dims()
            .map_err(|e| FlowError::DeviceNotReady(e.to_string()))?;
        if width == 0 || height == 0 {
            return Err(FlowError::DeviceNotReady(format!(
                "frame is {width}x{height}"
            )));
        }

        self.set_state(FlowState::Capturing);
        let jpeg = facegate_image::encode_jpeg(raster, CAPTURE_JPEG_QUALITY).await?;
        log::debug!("captured {width}x{height} frame, {} bytes", jpeg.len());

        Ok(CapturedFrame::new(jpeg, width, height))
    }

    /// Upload a frame and react to the verdict.
    ///
    /// Updates the status for every outcome and navigates on success.
    pub async fn submit_frame(&self, frame: &CapturedFrame) -> Result<VerificationResult, FlowError> {
        if frame.is_empty() {
            return Err(FlowError::EmptyFrame);
        }

        self.set_state(FlowState::Submitting);
        self.status.show(messages::SENDING, Tone::Neutral);

        let result = self.endpoint.submit(frame).await;
        self.apply_result(&result);
        Ok(result)
    }

    fn apply_result(&self, result: &VerificationResult) {
        match result {
            VerificationResult::Success { redirect_target } => {
                self.status.show(messages::VERIFIED, Tone::Success);
                self.set_state(FlowState::Succeeded);
                log::info!("verification succeeded, navigating to {redirect_target}");
                self.navigator.navigate(redirect_target);
                return;
            }
            VerificationResult::NotFound => {
                log::warn!("no enrolled face on the server");
                self.status.show(messages::NO_ENROLLED_FACE, Tone::Error);
            }
            VerificationResult::Failure { message } => {
                log::warn!("verification rejected: {message}");
                self.status.show(
                    &format!("{} {message}", messages::VERIFICATION_FAILED),
                    Tone::Error,
                );
            }
            VerificationResult::TransportError { detail } => {
                log::error!("verification transport error: {detail}");
                self.status
                    .show(&format!("{} {detail}", messages::NETWORK_ERROR), Tone::Error);
            }
        }
        self.set_state(FlowState::Failed);
        self.settle();
    }

    fn report(&self, error: &FlowError) {
        let text = match error {
            FlowError::DeviceAccess(e) => format!("{} {e}", messages::ACCESS_DENIED),
            FlowError::DeviceNotReady(detail) => format!("{} {detail}", messages::NOT_READY),
            FlowError::Encode(e) => format!("{} {e}", messages::ENCODE_FAILED),
            FlowError::EmptyFrame => messages::EMPTY_FRAME.to_string(),
            FlowError::Busy => return,
        };
        log::error!("capture failed: {error}");
        self.status.show(&text, Tone::Error);
    }

    /// Handle a press of the capture trigger: capture, then submit.
    ///
    /// Presses while a sequence is in flight are ignored. The trigger is
    /// disabled until the sequence reaches a terminal outcome.
    pub async fn trigger(&self) -> TriggerOutcome {
        if self.state() == FlowState::Succeeded {
            return TriggerOutcome::Ignored;
        }
        let Some(_guard) = self.begin_busy() else {
            log::debug!("trigger ignored, sequence in flight");
            return TriggerOutcome::Ignored;
        };

        let outcome = match self.capture_frame().await {
            Ok(frame) => self.submit_frame(&frame).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(result) => TriggerOutcome::Completed(result),
            Err(e) => {
                self.report(&e);
                self.settle();
                TriggerOutcome::Aborted(e)
            }
        }
    }

    /// Stop the camera stream. Safe to call repeatedly.
    pub fn release(&self) {
        if self.session.borrow_mut().take().is_some() {
            log::info!("camera stream released");
        }
        if self.state() != FlowState::Succeeded {
            self.set_state(FlowState::Idle);
        }
    }
}
