//! Error types and handling
//!
//! The simulation itself has no recoverable failures: a full queue turns
//! into an abandonment and an undefined service rate into the fallback rate.
//! What remains are setup failures, all of them fatal for the run.

use crate::types::{ConfigError, ConfigValidationError};
use thiserror::Error;

/// Errors that can occur while setting up or running a simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    Configuration(#[from] ConfigValidationError),

    /// Configuration could not be loaded
    #[error("Configuration loading failed: {0}")]
    ConfigLoad(#[from] ConfigError),

    /// A queue or replica buffer could not be allocated
    #[error("Failed to allocate {what} for {requested} entries")]
    Allocation {
        /// What was being allocated
        what: &'static str,
        /// Requested number of entries
        requested: usize,
    },

    /// The worker thread pool could not be built
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimulationError {
    /// Create an allocation error
    pub fn allocation(what: &'static str, requested: usize) -> Self {
        Self::Allocation { what, requested }
    }

    /// Create a thread pool error
    pub fn thread_pool(msg: impl Into<String>) -> Self {
        Self::ThreadPool(msg.into())
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::Configuration(_) | SimulationError::ConfigLoad(_) => "Configuration",
            SimulationError::Allocation { .. } => "Allocation",
            SimulationError::ThreadPool(_) => "Thread Pool",
            SimulationError::Serialization(_) => "Serialization",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;
