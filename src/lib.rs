// src/lib.rs
//! Cubelink
//!
//! Interaction core for an immersive sandbox where users spawn, grab, scale,
//! delete and connect cubes with hand pinches or controller triggers. The
//! host XR runtime supplies poses, input events and rendering; this crate
//! decides what those inputs do.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod graph;
pub mod input;
pub mod interaction;
pub mod prelude;
pub mod session;
pub mod ui;

// Re-export main types for convenience
pub use app::SandboxApp;
pub use session::Session;

