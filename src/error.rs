//! Engine error type
//!
//! Illegal moves are not errors: they come back as `false`/`None`.
//! Only structural problems that make an engine impossible to build end up here.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Board dimensions that cannot hold a single piece
    InvalidDimensions { width: usize, height: usize },
    /// A configuration value outside its allowed range
    InvalidConfig(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidDimensions { width, height } => {
                write!(f, "invalid board dimensions {}x{}", width, height)
            }
            EngineError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
