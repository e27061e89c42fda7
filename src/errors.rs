// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the optics calculator

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Optics formula rejected an argument
    Optics(OpticsError),
    /// Configuration/profile errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Errors produced by the optics formulas
///
/// Every formula validates its physical preconditions up front and reports
/// the first violated one. Results that are legitimately unbounded (the far
/// depth-of-field edge at or beyond the hyperfocal distance) are not errors;
/// they are represented by [`crate::optics::DofBound::Infinite`].
#[derive(Debug, Clone, PartialEq)]
pub enum OpticsError {
    /// An argument violated its physical precondition
    InvalidArgument {
        /// Parameter name as it appears in the function signature
        name: &'static str,
        /// The offending value
        value: f64,
        /// The constraint that was violated
        constraint: &'static str,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Optics(e) => write!(f, "Optics error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for OpticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpticsError::InvalidArgument {
                name,
                value,
                constraint,
            } => {
                write!(f, "invalid {}: {} (must be {})", name, value, constraint)
            }
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for OpticsError {}

// Conversions from sub-errors to AppError
impl From<OpticsError> for AppError {
    fn from(err: OpticsError) -> Self {
        AppError::Optics(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

// Conversions for I/O and parse errors
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
