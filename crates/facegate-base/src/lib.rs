pub mod logging;
pub mod tensor;

pub use logging::{ConsoleLogger, FileLogger, init_console_logger, init_file_logger};
pub use tensor::{Tensor, TensorError};

// Re-export log crate so downstream crates can use facegate_base::log::*
pub use log;
