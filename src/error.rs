//! Error handling for the iostat relay crate.

/// A specialized `Result` type for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

/// The main error type for relay operations.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Spawning or controlling the iostat child failed
    #[error("Subprocess error: {0}")]
    Subprocess(String),

    /// The iostat output stream ended without a termination request
    #[error("iostat output closed unexpectedly")]
    StreamEnded,

    /// Sending a metric line to the agent failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RelayError {
    /// Create a new subprocess error
    pub fn subprocess_error(msg: impl Into<String>) -> Self {
        Self::Subprocess(msg.into())
    }

    /// Create a new transport error
    pub fn transport_error(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
