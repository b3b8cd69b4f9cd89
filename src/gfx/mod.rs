//! # Graphics Module
//!
//! Spatial and visual side of the sandbox. Nothing here talks to a GPU: the
//! host renders whatever [`render::FrameView`] describes.
//!
//! - **Scene** ([`scene`]) - Transforms and the registry of live cubes
//! - **Picking** ([`picking`]) - Rays, bounding volumes and the hit-test strategies
//! - **Render** ([`render`]) - Per-frame snapshot handed to the host renderer
//! - **Camera** ([`camera`]) - Fixed desktop camera for the windowed host

pub mod camera;
pub mod picking;
pub mod render;
pub mod scene;

// Re-export commonly used types
pub use camera::DesktopCamera;
pub use render::{FrameRenderer, FrameView};
