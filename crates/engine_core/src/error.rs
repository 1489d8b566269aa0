//! Error taxonomy shared by mesh generation, rendering and capture.

use std::path::PathBuf;

/// Everything the core can fail with. All variants are surfaced to the caller
/// of the current operation; nothing is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed geometry parameters (non-positive edge length, negative cube
    /// count) or a pixel buffer that does not match its declared layout.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The graphics device could not create a vertex buffer or render target.
    #[error("resource creation failed: {0}")]
    ResourceCreation(String),

    /// A capture file could not be written.
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A render loop operation was called in a state that does not allow it.
    #[error("lifecycle violation: {0}")]
    Lifecycle(String),

    /// Surface acquisition or buffer mapping failed on the device.
    #[error("graphics device error: {0}")]
    Device(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn resource_creation(msg: impl Into<String>) -> Self {
        Self::ResourceCreation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
