//! Error types for the renderer.

use thiserror::Error;

/// Failure taxonomy for the demo.
///
/// Everything here is fatal to the process except the surface conditions the
/// lifecycle controller handles internally (outdated/lost surfaces are
/// reconfigured, never surfaced to the app).
#[derive(Debug, Error)]
pub enum Error {
    /// Device, adapter, surface or pipeline creation failed at startup.
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// Per-resize resource recreation failed.
    #[error("frame resource creation failed: {0}")]
    ResourceCreation(String),

    /// The GPU can no longer execute work, or a drain target will never
    /// signal. No recovery path in this demo.
    #[error("graphics device lost: {0}")]
    DeviceLost(String),

    /// Swap-chain acquisition failed in a way the frame loop can't absorb.
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Result type alias using the demo's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
