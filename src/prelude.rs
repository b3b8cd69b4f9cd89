//! # Cubelink Prelude
//!
//! Commonly used types in one import, for hosts driving a [`Session`].
//!
//! ## Usage
//!
//! ```rust
//! use cubelink::prelude::*;
//!
//! let mut session = Session::new(SandboxConfig::default()).unwrap();
//! let event = InputEvent::new(Handedness::Left, InputEventKind::GestureStart, InputSourceKind::Hand)
//!     .with_pose(Transform::from_position(Vector3::new(0.0, 1.0, -0.3)));
//! assert_eq!(session.handle_event(&event), Routed::Transition(Transition::PreviewStarted));
//! ```

// Re-export core session types
pub use crate::session::{Session, SessionStatus};
pub use crate::app::SandboxApp;
pub use crate::config::SandboxConfig;
pub use crate::error::{AppError, ConfigError};

// Re-export input types
pub use crate::input::{
    FrameInput, GamepadState, Handedness, InputEvent, InputEventKind, InputSource,
    InputSourceKind, TrackedSource,
};

// Re-export interaction and graph types
pub use crate::interaction::{Routed, Transition};
pub use crate::graph::{ConnectOutcome, DuplicatePolicy, SelectionEvent};

// Re-export scene and rendering types
pub use crate::gfx::scene::{ObjectId, Transform};
pub use crate::gfx::render::{FrameRenderer, FrameView, LogRenderer};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Quaternion, Vector3, Zero};
