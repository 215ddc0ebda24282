//! Capture-and-verify interaction flow.
//!
//! [`CaptureFlowController`] ties a [`MediaCaptureDevice`] to a
//! [`VerificationEndpoint`] and reports progress through a [`StatusSurface`].

pub mod controller;
pub mod error;
pub mod status;

pub use controller::{CaptureFlowController, FlowState, TriggerOutcome};
pub use error::FlowError;
pub use status::{Navigator, StatusSurface, Tone, messages};

pub use facegate_camera::{MediaCaptureDevice, VideoStream};
pub use facegate_verify::{CapturedFrame, VerificationEndpoint, VerificationResult};
