//! Error types for the scene's input and configuration boundaries.
//!
//! The simulation core itself has no error path; only parsing user-supplied
//! values can fail.

use std::fmt;

/// Main error type for fallible scene operations.
#[derive(Debug)]
pub enum SceneError {
    /// A gravity option value could not be read as a finite number.
    InvalidGravity(String),
    /// A UI action name did not match any known command.
    UnknownCommand(String),
    /// A configuration document failed to parse.
    Config(toml::de::Error),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidGravity(value) => write!(f, "Invalid gravity value: {value:?}"),
            Self::UnknownCommand(action) => write!(f, "Unknown command: {action:?}"),
            Self::Config(err) => write!(f, "Config error: {err}"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

/// Convenient Result type alias for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;

impl From<toml::de::Error> for SceneError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err)
    }
}
