/// Styling of the status text. `Success` and `Error` never apply together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Success,
    Error,
}

/// Where the user sees what the flow is doing.
///
/// Methods take `&self`; implementations use interior mutability.
pub trait StatusSurface {
    /// Replace the status text and its styling.
    fn show(&self, text: &str, tone: Tone);

    /// Enable or disable the capture trigger.
    fn set_trigger_enabled(&self, enabled: bool);
}

/// Receives the redirect target after a successful verification.
pub trait Navigator {
    fn navigate(&self, target: &str);
}

/// Fixed status texts.
pub mod messages {
    pub const ACQUIRING: &str = "Starting camera...";
    pub const ACCESS_DENIED: &str = "Error: camera access denied.";
    pub const NOT_READY: &str = "Error: camera is not ready yet.";
    pub const ENCODE_FAILED: &str = "Error: could not encode image.";
    pub const EMPTY_FRAME: &str = "Error: captured image is empty.";
    pub const SENDING: &str = "Sending image...";
    pub const VERIFIED: &str = "Verification succeeded!";
    pub const NO_ENROLLED_FACE: &str =
        "No enrolled face. Please set up face authentication first.";
    pub const VERIFICATION_FAILED: &str = "Verification failed:";
    pub const NETWORK_ERROR: &str = "Network error:";
}
