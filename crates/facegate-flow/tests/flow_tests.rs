use facegate_base::Tensor;
use facegate_camera::CameraError;
use facegate_flow::{
    CaptureFlowController, CapturedFrame, FlowError, FlowState, MediaCaptureDevice, Navigator,
    StatusSurface, Tone, TriggerOutcome, VerificationEndpoint, VerificationResult, VideoStream,
    messages,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

// --- mocks -----------------------------------------------------------------

struct MockDevice {
    frame: Option<Tensor<u8>>,
    deny: Cell<bool>,
    requests: Cell<usize>,
}

impl MockDevice {
    fn with_frame(width: usize, height: usize) -> Self {
        let frame = Tensor::image(width, height, 3, vec![90u8; width * height * 3]).unwrap();
        Self {
            frame: Some(frame),
            deny: Cell::new(false),
            requests: Cell::new(0),
        }
    }

    fn without_frame() -> Self {
        Self {
            frame: None,
            deny: Cell::new(false),
            requests: Cell::new(0),
        }
    }

    fn denied(self) -> Self {
        self.deny.set(true);
        self
    }
}

struct MockStream {
    frame: Option<Tensor<u8>>,
}

impl MediaCaptureDevice for MockDevice {
    type Stream = MockStream;

    async fn request_stream(&self) -> Result<MockStream, CameraError> {
        self.requests.set(self.requests.get() + 1);
        if self.deny.get() {
            return Err(CameraError::PermissionDenied("user dismissed the prompt".to_string()));
        }
        Ok(MockStream {
            frame: self.frame.clone(),
        })
    }
}

impl VideoStream for MockStream {
    fn current_frame(&self) -> Option<Tensor<u8>> {
        self.frame.clone()
    }
}

#[derive(Default)]
struct MockEndpoint {
    replies: RefCell<VecDeque<VerificationResult>>,
    received: RefCell<Vec<CapturedFrame>>,
    delay: Option<Duration>,
}

impl MockEndpoint {
    fn replying(replies: Vec<VerificationResult>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            ..Default::default()
        }
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl VerificationEndpoint for MockEndpoint {
    async fn submit(&self, frame: &CapturedFrame) -> VerificationResult {
        self.received.borrow_mut().push(frame.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .borrow_mut()
            .pop_front()
            .expect("unexpected submission")
    }
}

#[derive(Default)]
struct RecordingStatus {
    shown: RefCell<Vec<(String, Tone)>>,
    trigger: RefCell<Vec<bool>>,
}

impl RecordingStatus {
    fn last(&self) -> (String, Tone) {
        self.shown
            .borrow()
            .last()
            .cloned()
            .unwrap_or((String::new(), Tone::Neutral))
    }

    fn trigger_enabled(&self) -> bool {
        self.trigger.borrow().last().copied().unwrap_or(true)
    }
}

impl StatusSurface for RecordingStatus {
    fn show(&self, text: &str, tone: Tone) {
        self.shown.borrow_mut().push((text.to_string(), tone));
    }

    fn set_trigger_enabled(&self, enabled: bool) {
        self.trigger.borrow_mut().push(enabled);
    }
}

#[derive(Default)]
struct RecordingNavigator {
    targets: RefCell<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &str) {
        self.targets.borrow_mut().push(target.to_string());
    }
}

type Flow = CaptureFlowController<MockDevice, MockEndpoint, RecordingStatus, RecordingNavigator>;

fn flow(device: MockDevice, endpoint: MockEndpoint) -> Flow {
    CaptureFlowController::new(
        device,
        endpoint,
        RecordingStatus::default(),
        RecordingNavigator::default(),
    )
}

fn flow_received(flow: &Flow) -> Vec<CapturedFrame> {
    flow.endpoint().received.borrow().clone()
}

fn success(target: &str) -> VerificationResult {
    VerificationResult::Success {
        redirect_target: target.to_string(),
    }
}

// --- scenarios -------------------------------------------------------------

#[tokio::test]
async fn test_grant_capture_and_redirect() {
    let flow = flow(
        MockDevice::with_frame(64, 48),
        MockEndpoint::replying(vec![success("/dashboard")]),
    );

    flow.acquire_device().await.unwrap();
    assert_eq!(flow.state(), FlowState::Ready);
    assert_eq!(flow.status().last(), (String::new(), Tone::Neutral));

    let outcome = flow.trigger().await;
    assert!(matches!(outcome, TriggerOutcome::Completed(ref r) if r.is_success()));
    assert_eq!(flow.state(), FlowState::Succeeded);
    assert_eq!(*flow.navigator().targets.borrow(), vec!["/dashboard".to_string()]);
    assert_eq!(
        flow.status().last(),
        (messages::VERIFIED.to_string(), Tone::Success)
    );

    let received = flow_received(&flow);
    assert_eq!(received.len(), 1);
    assert_eq!((received[0].width, received[0].height), (64, 48));
    assert_eq!(&received[0].jpeg[..2], &[0xFF, 0xD8]);
}

#[tokio::test]
async fn test_success_without_redirect_goes_to_root() {
    let flow = flow(
        MockDevice::with_frame(8, 8),
        MockEndpoint::replying(vec![success("/")]),
    );
    flow.acquire_device().await.unwrap();
    flow.trigger().await;
    assert_eq!(*flow.navigator().targets.borrow(), vec!["/".to_string()]);
}

#[tokio::test]
async fn test_denied_camera_keeps_trigger_enabled() {
    let device = MockDevice::with_frame(8, 8).denied();
    let flow = flow(device, MockEndpoint::default());

    let err = flow.acquire_device().await.unwrap_err();
    assert!(matches!(err, FlowError::DeviceAccess(CameraError::PermissionDenied(_))));
    assert_eq!(flow.state(), FlowState::Idle);

    let (text, tone) = flow.status().last();
    assert!(text.starts_with(messages::ACCESS_DENIED));
    assert!(text.contains("user dismissed the prompt"));
    assert_eq!(tone, Tone::Error);
    assert!(flow.status().trigger_enabled());

    // pressing the trigger fails the same way every time, without uploading
    for _ in 0..2 {
        let outcome = flow.trigger().await;
        assert!(matches!(outcome, TriggerOutcome::Aborted(FlowError::DeviceAccess(_))));
        assert!(flow.status().last().0.starts_with(messages::ACCESS_DENIED));
        assert!(flow.status().trigger_enabled());
    }
    assert!(flow_received(&flow).is_empty());
}

#[tokio::test]
async fn test_reacquire_after_permission_granted() {
    let flow = flow(
        MockDevice::with_frame(8, 8).denied(),
        MockEndpoint::replying(vec![success("/chat/")]),
    );
    assert!(flow.acquire_device().await.is_err());

    flow.device().deny.set(false);
    flow.acquire_device().await.unwrap();
    assert_eq!(flow.device().requests.get(), 2);

    assert!(matches!(flow.trigger().await, TriggerOutcome::Completed(_)));
    assert_eq!(*flow.navigator().targets.borrow(), vec!["/chat/".to_string()]);
}

#[tokio::test]
async fn test_not_found_is_error_styled() {
    let flow = flow(
        MockDevice::with_frame(8, 8),
        MockEndpoint::replying(vec![VerificationResult::NotFound]),
    );
    flow.acquire_device().await.unwrap();

    let outcome = flow.trigger().await;
    assert!(matches!(outcome, TriggerOutcome::Completed(VerificationResult::NotFound)));
    assert_eq!(
        flow.status().last(),
        (messages::NO_ENROLLED_FACE.to_string(), Tone::Error)
    );
    assert!(flow.status().shown.borrow().iter().all(|(_, tone)| *tone != Tone::Success));
    assert_eq!(flow.state(), FlowState::Ready);
    assert!(flow.navigator().targets.borrow().is_empty());
}

#[tokio::test]
async fn test_failure_message_from_server() {
    let flow = flow(
        MockDevice::with_frame(8, 8),
        MockEndpoint::replying(vec![VerificationResult::Failure {
            message: "face does not match".to_string(),
        }]),
    );
    flow.acquire_device().await.unwrap();
    flow.trigger().await;

    assert_eq!(
        flow.status().last(),
        (
            "Verification failed: face does not match".to_string(),
            Tone::Error
        )
    );
    assert_eq!(flow.state(), FlowState::Ready);
    assert!(flow.status().trigger_enabled());
}

#[tokio::test]
async fn test_network_error_prefix_and_detail() {
    let flow = flow(
        MockDevice::with_frame(8, 8),
        MockEndpoint::replying(vec![VerificationResult::TransportError {
            detail: "connection refused".to_string(),
        }]),
    );
    flow.acquire_device().await.unwrap();
    flow.trigger().await;

    let (text, tone) = flow.status().last();
    assert_eq!(text, "Network error: connection refused");
    assert_eq!(tone, Tone::Error);
}

#[tokio::test]
async fn test_sequential_attempts_are_independent() {
    let flow = flow(
        MockDevice::with_frame(16, 16),
        MockEndpoint::replying(vec![
            VerificationResult::Failure {
                message: "blurry".to_string(),
            },
            success("/home"),
        ]),
    );
    flow.acquire_device().await.unwrap();

    assert!(matches!(
        flow.trigger().await,
        TriggerOutcome::Completed(VerificationResult::Failure { .. })
    ));
    assert!(flow.navigator().targets.borrow().is_empty());

    assert!(matches!(flow.trigger().await, TriggerOutcome::Completed(ref r) if r.is_success()));
    assert_eq!(*flow.navigator().targets.borrow(), vec!["/home".to_string()]);

    let received = flow_received(&flow);
    assert_eq!(received.len(), 2);
    assert_eq!(received[0], received[1]);
}

#[tokio::test]
async fn test_overlapping_trigger_is_ignored() {
    let flow = flow(
        MockDevice::with_frame(8, 8),
        MockEndpoint::replying(vec![VerificationResult::NotFound])
            .slow(Duration::from_millis(50)),
    );
    flow.acquire_device().await.unwrap();
    flow.status().trigger.borrow_mut().clear();

    let (first, second) = tokio::join!(flow.trigger(), flow.trigger());
    assert!(matches!(first, TriggerOutcome::Completed(VerificationResult::NotFound)));
    assert!(matches!(second, TriggerOutcome::Ignored));
    assert_eq!(flow_received(&flow).len(), 1);

    // disabled for the whole sequence, enabled again at the end
    assert_eq!(*flow.status().trigger.borrow(), vec![false, true]);
    assert!(!flow.is_busy());
}

#[tokio::test]
async fn test_acquire_while_submitting_is_busy() {
    let flow = flow(
        MockDevice::with_frame(8, 8),
        MockEndpoint::replying(vec![VerificationResult::NotFound])
            .slow(Duration::from_millis(50)),
    );
    flow.acquire_device().await.unwrap();

    let (outcome, reacquire) = tokio::join!(flow.trigger(), flow.acquire_device());
    assert!(matches!(outcome, TriggerOutcome::Completed(_)));
    assert!(matches!(reacquire, Err(FlowError::Busy)));
    assert_eq!(flow.device().requests.get(), 1);
}

#[tokio::test]
async fn test_capture_before_first_frame_is_not_ready() {
    let flow = flow(MockDevice::without_frame(), MockEndpoint::default());
    flow.acquire_device().await.unwrap();

    let outcome = flow.trigger().await;
    assert!(matches!(outcome, TriggerOutcome::Aborted(FlowError::DeviceNotReady(_))));
    assert!(flow.status().last().0.starts_with(messages::NOT_READY));
    assert_eq!(flow.state(), FlowState::Ready);
}

#[tokio::test]
async fn test_zero_sized_frame_is_not_ready() {
    let flow = flow(MockDevice::with_frame(0, 0), MockEndpoint::default());
    flow.acquire_device().await.unwrap();

    let err = flow.capture_frame().await.unwrap_err();
    assert!(matches!(err, FlowError::DeviceNotReady(ref msg) if msg == "frame is 0x0"));
}

#[tokio::test]
async fn test_empty_frame_is_rejected_before_upload() {
    let flow = flow(MockDevice::with_frame(8, 8), MockEndpoint::default());
    let err = flow
        .submit_frame(&CapturedFrame::new(Vec::new(), 8, 8))
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::EmptyFrame));
    assert!(flow_received(&flow).is_empty());
}

#[tokio::test]
async fn test_trigger_after_success_is_ignored() {
    let flow = flow(
        MockDevice::with_frame(8, 8),
        MockEndpoint::replying(vec![success("/")]),
    );
    flow.acquire_device().await.unwrap();
    flow.trigger().await;

    assert!(matches!(flow.trigger().await, TriggerOutcome::Ignored));
    assert!(!flow.status().trigger_enabled());
}

#[tokio::test]
async fn test_release_returns_to_idle() {
    let flow = flow(MockDevice::with_frame(8, 8), MockEndpoint::default());
    flow.acquire_device().await.unwrap();
    assert!(flow.has_session());

    flow.release();
    flow.release();
    assert!(!flow.has_session());
    assert_eq!(flow.state(), FlowState::Idle);

    let outcome = flow.trigger().await;
    assert!(matches!(outcome, TriggerOutcome::Aborted(FlowError::DeviceAccess(_))));
}

#[tokio::test]
async fn test_capture_encodes_at_upload_quality() {
    let device = MockDevice::with_frame(32, 24);
    let raster = device.frame.clone().unwrap();
    let flow = flow(device, MockEndpoint::default());
    flow.acquire_device().await.unwrap();

    let frame = flow.capture_frame().await.unwrap();
    let expected =
        facegate_image::encode_jpeg_blocking(&raster, facegate_image::CAPTURE_JPEG_QUALITY).unwrap();
    assert_eq!(frame.jpeg, expected);
    assert_eq!((frame.width, frame.height), (32, 24));
    assert_eq!(flow.state(), FlowState::Capturing);
}
