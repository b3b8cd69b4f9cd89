//! # Render Delegation
//!
//! The sandbox does not draw anything itself. At the end of every frame it
//! builds a [`FrameView`] snapshot and hands it to the host's
//! [`FrameRenderer`]. Instance and line data are `#[repr(C)]` and
//! [`bytemuck::Pod`] so a GPU host can upload them without conversion.

use bytemuck::{Pod, Zeroable};
use cgmath::Vector3;

use crate::gfx::scene::{ObjectId, SpawnedObject, Transform};
use crate::graph::LineSegment;

/// Per-cube instance data
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CubeInstance {
    /// Model matrix (column major)
    pub model: [[f32; 4]; 4],
    /// Base colour (RGBA)
    pub color: [f32; 4],
    /// Emissive tint (RGB, alpha unused)
    pub emissive: [f32; 4],
}

impl CubeInstance {
    pub fn new(transform: &Transform, color: [f32; 3], emissive: [f32; 3]) -> Self {
        Self {
            model: transform.to_matrix().into(),
            color: [color[0], color[1], color[2], 1.0],
            emissive: [emissive[0], emissive[1], emissive[2], 0.0],
        }
    }

    pub fn from_object(object: &SpawnedObject) -> Self {
        Self::new(&object.world, object.material.base_color, object.material.emissive)
    }
}

/// One end of a connection line
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
}

impl LineVertex {
    /// The two vertices of a line segment
    pub fn segment(line: &LineSegment) -> [LineVertex; 2] {
        [
            LineVertex {
                position: line.start.into(),
            },
            LineVertex {
                position: line.end.into(),
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonView {
    pub label: String,
    pub center: Vector3<f32>,
    /// 1.0 at rest, the hover scale while hovered or pressed
    pub scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorView {
    pub origin: Vector3<f32>,
    pub tip: Vector3<f32>,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameView {
    pub frame: u64,
    pub cubes: Vec<CubeInstance>,
    /// Spawn previews still attached to a hand
    pub previews: Vec<CubeInstance>,
    /// Two vertices per connection
    pub lines: Vec<LineVertex>,
    pub buttons: Vec<ButtonView>,
    pub cursors: Vec<CursorView>,
    pub message: Option<String>,
    /// Objects waiting in the connection selection
    pub selected: Vec<ObjectId>,
    pub connection_mode: bool,
}

impl FrameView {
    pub fn cube_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cubes)
    }

    pub fn preview_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.previews)
    }

    pub fn line_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.lines)
    }
}

/// The host's renderer, invoked once at the end of every frame
pub trait FrameRenderer {
    fn render(&mut self, frame: &FrameView);
}

/// Renderer that only logs what it would draw. Used by the desktop host,
/// which has no drawing surface of its own.
#[derive(Debug, Default)]
pub struct LogRenderer {
    last_counts: (usize, usize),
}

impl FrameRenderer for LogRenderer {
    fn render(&mut self, frame: &FrameView) {
        let counts = (frame.cubes.len(), frame.lines.len() / 2);
        if counts != self.last_counts {
            log::info!("frame {}: {} cube(s), {} connection(s)", frame.frame, counts.0, counts.1);
            self.last_counts = counts;
        }
        log::trace!(
            "frame {}: {} preview(s), {} cursor(s), connection mode {}",
            frame.frame,
            frame.previews.len(),
            frame.cursors.len(),
            frame.connection_mode
        );
    }
}
