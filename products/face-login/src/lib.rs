pub mod source;
pub mod terminal;

pub use source::{CaptureSource, SourceStream};
pub use terminal::{RedirectNavigator, TerminalStatus};
