//! Error types for the Doorman service.

use thiserror::Error;

/// Main error type for Doorman operations.
#[derive(Error, Debug)]
pub enum DoormanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid throttle policy values, caught at construction time
    #[error("Invalid throttle policy: {0}")]
    Policy(String),

    /// gRPC server errors
    #[error("gRPC error: {0}")]
    Grpc(#[from] tonic::transport::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Doorman operations.
pub type Result<T> = std::result::Result<T, DoormanError>;
