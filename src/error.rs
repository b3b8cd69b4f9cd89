//! Error types at the crate boundary.
//!
//! The interaction core itself never fails: invalid transitions are ignored
//! and untracked inputs mean "no interaction this frame". Errors only arise
//! when building a session from a bad configuration or when the desktop host
//! cannot start its event loop.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("colour palette must contain at least one colour")]
    EmptyPalette,
    #[error("axis threshold must lie strictly between 0 and 1, got {0}")]
    AxisThreshold(f32),
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("exit delay cannot be negative, got {0}")]
    NegativeDelay(f32),
    #[error("button hover scale must be at least 1.0, got {0}")]
    HoverScale(f32),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid sandbox configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
