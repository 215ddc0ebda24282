use crate::{CapturedFrame, VerificationResult};

/// Remote service that checks a captured face and returns a verdict.
///
/// Every failure, including transport failures, is reported as a
/// [`VerificationResult`] variant; implementations never retry.
#[allow(async_fn_in_trait)]
pub trait VerificationEndpoint {
    async fn submit(&self, frame: &CapturedFrame) -> VerificationResult;
}
