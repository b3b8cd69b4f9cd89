//! Per-hand interaction state.

use crate::gfx::scene::{ObjectId, Transform};
use crate::input::Handedness;
use crate::interaction::palette::ColorCycler;

/// A cube being placed: follows the hand until the gesture ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSpawnPreview {
    /// Offset from the hand pose
    pub local: Transform,
    pub cycler: ColorCycler,
    /// Last resolved world transform, used if the hand drops tracking
    /// before the gesture ends
    pub last_world: Option<Transform>,
}

impl PendingSpawnPreview {
    pub fn new(local: Transform) -> Self {
        Self {
            local,
            cycler: ColorCycler::default(),
            last_world: None,
        }
    }

    /// World transform for a given hand pose
    pub fn world(&self, hand_pose: &Transform) -> Transform {
        hand_pose.compose(&self.local)
    }
}

/// What a hand is holding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabState {
    pub grabbed_object: ObjectId,
    /// Emissive colour the object had before the grab highlight
    pub previous_emissive: [f32; 3],
}

/// State of one hand
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HandMode {
    #[default]
    Idle,
    Previewing(PendingSpawnPreview),
    Grabbing(GrabState),
    /// Second hand of a two-handed scale; the object stays with the other hand
    Scaling,
}

impl HandMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, HandMode::Idle)
    }

    pub fn grabbed(&self) -> Option<ObjectId> {
        match self {
            HandMode::Grabbing(grab) => Some(grab.grabbed_object),
            _ => None,
        }
    }
}

/// Two-handed scaling of one grabbed object. Present only while active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingState {
    pub target_object: ObjectId,
    pub initial_scale: f32,
    pub initial_inter_hand_distance: f32,
    /// Hand holding the object
    pub grabbing_hand: Handedness,
    /// Hand that joined to scale
    pub scaling_hand: Handedness,
}

impl ScalingState {
    /// Scale for the current distance between the hands' reference points
    pub fn scale_for(&self, distance: f32, min_scale: f32) -> f32 {
        (self.initial_scale + (distance - self.initial_inter_hand_distance)).max(min_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaling() -> ScalingState {
        ScalingState {
            target_object: crate::gfx::scene::SpatialRegistry::new().spawn(
                Transform::identity(),
                0.05,
                crate::gfx::scene::Material::new([1.0; 3]),
            ),
            initial_scale: 1.0,
            initial_inter_hand_distance: 0.3,
            grabbing_hand: Handedness::Left,
            scaling_hand: Handedness::Right,
        }
    }

    #[test]
    fn test_scale_is_additive_in_distance() {
        let s = scaling();
        assert!((s.scale_for(0.3, 0.01) - 1.0).abs() < 1e-6);
        assert!((s.scale_for(0.8, 0.01) - 1.5).abs() < 1e-6);
        assert!((s.scale_for(0.1, 0.01) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_scale_clamped_to_minimum() {
        let s = scaling();
        assert_eq!(s.scale_for(-5.0, 0.01), 0.01);
    }

    #[test]
    fn test_preview_follows_hand() {
        let preview = PendingSpawnPreview::new(Transform::from_position(cgmath::Vector3::new(
            0.0, 0.0, -0.1,
        )));
        let hand = Transform::from_position(cgmath::Vector3::new(1.0, 1.0, 1.0));
        let world = preview.world(&hand);
        assert!((world.position.z - 0.9).abs() < 1e-6);
    }
}
