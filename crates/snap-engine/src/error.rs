use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the snap engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// Errors reported by the window backend.
    #[error("Window backend error: {0}")]
    World(#[from] snap_world::Error),

    /// The engine's event channel has been closed.
    #[error("Engine channel closed")]
    ChannelClosed,

    /// I/O failure while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
