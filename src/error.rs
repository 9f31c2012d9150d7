//! # Error Types
//!
//! Custom error types for padpoll using `thiserror`.

use thiserror::Error;

/// Main error type for padpoll
#[derive(Debug, Error)]
pub enum PadPollError {
    /// Button index outside `1..=count` on a digital query
    #[error("button {button} is out of range (valid buttons: 1..={count})")]
    ButtonOutOfRange { button: usize, count: usize },

    /// Controller device errors
    #[error("Controller error: {0}")]
    Controller(String),

    /// No joystick-class device at the requested port
    #[error("No controller found on port {port}")]
    ControllerNotFound { port: u32 },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for padpoll
pub type Result<T> = std::result::Result<T, PadPollError>;
