use std::result::Result as StdResult;

use thiserror::Error;

use crate::{DisplayId, WindowId};

/// Convenient result type for window operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors reported by a [`WindowOps`](crate::WindowOps) backend.
#[derive(Debug, Error)]
pub enum Error {
    /// The window no longer exists (closed between snapshot and request).
    #[error("window {0} is gone")]
    WindowGone(WindowId),

    /// The display is not connected.
    #[error("display {0} unavailable")]
    DisplayUnavailable(DisplayId),

    /// The backend refused or failed the request.
    #[error("window backend error: {0}")]
    Backend(String),
}
