//! Error types for geocat-viz crates.

use thiserror::Error;

/// Result type alias using VizError.
pub type VizResult<T> = Result<T, VizError>;

/// Primary error type for diagram construction and rendering.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VizError {
    // === Configuration Errors ===
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Length mismatch for '{name}': expected {expected}, got {actual}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Legend requested but no labelled model set has been added")]
    NoLegendHandles,

    #[error("Configuration error: {0}")]
    Config(String),

    // === Domain Errors ===
    #[error("Value {value} out of domain for '{param}': {message}")]
    Domain {
        param: String,
        value: f64,
        message: String,
    },

    // === Backend Errors ===
    #[error("Unknown frame: {0}")]
    UnknownFrame(usize),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl VizError {
    /// Shorthand for an [`VizError::InvalidParameter`].
    pub fn invalid(param: impl Into<String>, message: impl Into<String>) -> Self {
        VizError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`VizError::Domain`].
    pub fn domain(param: impl Into<String>, value: f64, message: impl Into<String>) -> Self {
        VizError::Domain {
            param: param.into(),
            value,
            message: message.into(),
        }
    }

    /// Whether the caller can fix this error by changing its inputs.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            VizError::InvalidParameter { .. }
                | VizError::LengthMismatch { .. }
                | VizError::NoLegendHandles
                | VizError::Config(_)
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for VizError {
    fn from(err: std::io::Error) -> Self {
        VizError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VizError {
    fn from(err: serde_json::Error) -> Self {
        VizError::Config(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for VizError {
    fn from(err: serde_yaml::Error) -> Self {
        VizError::Config(format!("YAML error: {}", err))
    }
}
