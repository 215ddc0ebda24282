//! Camera access for the capture flow.
//!
//! A [`MediaCaptureDevice`] grants a [`VideoStream`]; the stream exposes the
//! frame it is currently showing. Backends: V4L2 (feature `v4l2`) and a
//! still-image file.

pub mod config;
pub mod convert;
pub mod error;
pub mod still;
pub mod surface;
pub mod traits;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::CameraConfig;
pub use error::CameraError;
pub use still::{StillImageDevice, StillImageStream};
pub use surface::{FramePublisher, FrameSurface, frame_surface};
pub use traits::{MediaCaptureDevice, VideoStream};

#[cfg(feature = "v4l2")]
pub use v4l2::{V4l2Device, V4l2Stream};
