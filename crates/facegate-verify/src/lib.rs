//! Client side of the face verification contract.
//!
//! A [`CapturedFrame`] is posted as multipart field `image`
//! (`webcam_capture.jpg`) together with the page's anti-forgery token; the
//! reply is decoded into a [`VerificationResult`].

pub mod config;
pub mod csrf;
pub mod endpoint;
pub mod error;
pub mod frame;
pub mod http;
pub mod result;

pub use config::EndpointConfig;
pub use csrf::extract_csrf_token;
pub use endpoint::VerificationEndpoint;
pub use error::VerifyError;
pub use frame::CapturedFrame;
pub use http::HttpEndpoint;
pub use result::{DEFAULT_FAILURE_MESSAGE, DEFAULT_REDIRECT, VerificationResult, decode_response};

// Re-export for callers resolving redirect targets
pub use reqwest::Url;
