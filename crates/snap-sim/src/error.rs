//! Error handling for the snap-sim crate.

use std::{io, result};

use thiserror::Error;

/// Convenient result type for simulator operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while loading or replaying a scenario.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The scenario file did not parse.
    #[error("Scenario parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The scenario parsed but is not usable.
    #[error("Invalid scenario: {0}")]
    Scenario(String),
    /// Errors surfaced by the engine (config loading, backend).
    #[error("Engine error: {0}")]
    Engine(#[from] snap_engine::Error),
    /// Report serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A zone name on the command line was not recognised.
    #[error("Unknown zone '{0}'")]
    UnknownZone(String),
}

impl Error {
    /// Helper for scenario validation failures.
    pub fn scenario<M: Into<String>>(msg: M) -> Self {
        Self::Scenario(msg.into())
    }
}
