//! # Interaction
//!
//! Everything between a raw input event and a change to the world: the
//! per-hand state machine, the preview colour palette and the router that
//! decides which transition an event maps to.
//!
//! - [`router`] - Routes discrete input events (hit-testing as needed)
//! - [`state_machine`] - Per-hand spawn, grab, scale and delete transitions
//! - [`hand`] - The data each hand state carries
//! - [`palette`] - Edge-triggered colour cycling for spawn previews

pub mod hand;
pub mod palette;
pub mod router;
pub mod state_machine;

pub use hand::{GrabState, HandMode, PendingSpawnPreview, ScalingState};
pub use palette::{ColorCycler, ColorPalette, CycleStep};
pub use router::{EventRouter, Routed};
pub use state_machine::{Interaction, Transition};
