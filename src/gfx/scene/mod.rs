//! # Scene Module
//!
//! Spatial state of the sandbox: the [`Transform`] type every object is placed
//! with, and the [`SpatialRegistry`] that owns the live cubes.
//!
//! ## Key Components
//!
//! - [`Transform`] - Position, orientation quaternion and uniform scale
//! - [`SpatialRegistry`] - Live [`SpawnedObject`]s in spawn order
//! - [`Parent`] - Whether an object is attached to the world root or to a hand
//!
//! ## Reparenting
//!
//! Grabbing moves an object's transform authority to a hand. The registry keeps
//! both the local transform (relative to the parent) and a cached world
//! transform; [`SpatialRegistry::attach`] rewrites the local part so the world
//! transform does not change across the call.

pub mod registry;
pub mod transform;

// Re-export main types
pub use registry::{Material, ObjectId, Parent, SpatialRegistry, SpawnedObject};
pub use transform::Transform;
