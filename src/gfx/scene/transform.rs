//! Rigid transform with a uniform scale.
//!
//! Every spatial thing in the sandbox (cubes, hands, controllers, UI panels) is
//! positioned with a [`Transform`]. Scale is a single scalar so composition and
//! inversion stay closed: the product of two transforms is again a transform.

use cgmath::{InnerSpace, Matrix4, One, Quaternion, Rotation, Vector3, Zero};

/// Position, orientation and uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Quaternion::one(),
            scale: 1.0,
        }
    }

    /// Create a transform at `position` with no rotation and unit scale
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn new(position: Vector3<f32>, rotation: Quaternion<f32>, scale: f32) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Builder-style uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Apply `child` in the space of `self` (parent * child)
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation.rotate_vector(child.position * self.scale),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }

    /// Inverse transform. A zero scale collapses to the identity scale so the
    /// result stays finite.
    pub fn inverse(&self) -> Transform {
        let inv_rotation = self.rotation.conjugate();
        let inv_scale = if self.scale.abs() > f32::EPSILON {
            1.0 / self.scale
        } else {
            1.0
        };
        Transform {
            position: inv_rotation.rotate_vector(-self.position) * inv_scale,
            rotation: inv_rotation,
            scale: inv_scale,
        }
    }

    /// Express a world-space transform relative to `self`, so that
    /// `self.compose(&self.relative(world)) == world`.
    pub fn relative(&self, world: &Transform) -> Transform {
        self.inverse().compose(world)
    }

    /// Transform a point from local into parent space
    pub fn transform_point(&self, point: Vector3<f32>) -> Vector3<f32> {
        self.position + self.rotation.rotate_vector(point * self.scale)
    }

    /// Local forward axis (-Z) rotated into parent space
    pub fn forward(&self) -> Vector3<f32> {
        let forward = self.rotation.rotate_vector(-Vector3::unit_z());
        if forward.magnitude2() > 0.0 {
            forward.normalize()
        } else {
            -Vector3::unit_z()
        }
    }

    /// 4x4 model matrix (translation * rotation * scale)
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_scale(self.scale)
    }

    /// Whether this is (numerically) the identity
    pub fn is_identity(&self) -> bool {
        self.position.magnitude2() < 1e-9
            && (self.rotation - Quaternion::one()).magnitude2() < 1e-9
            && (self.scale - 1.0).abs() < 1e-5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Rotation3};

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-4
    }

    #[test]
    fn test_compose_with_inverse_is_identity() {
        let t = Transform::new(
            Vector3::new(1.0, 2.0, 3.0),
            Quaternion::from_angle_y(Deg(40.0)),
            2.0,
        );
        assert!(t.compose(&t.inverse()).is_identity());
        assert!(t.inverse().compose(&t).is_identity());
    }

    #[test]
    fn test_relative_round_trips_world_transform() {
        let parent = Transform::new(
            Vector3::new(0.5, 1.0, -0.25),
            Quaternion::from_angle_x(Deg(30.0)),
            1.0,
        );
        let world = Transform::new(
            Vector3::new(-1.0, 0.0, 2.0),
            Quaternion::from_angle_z(Deg(90.0)),
            0.4,
        );
        let local = parent.relative(&world);
        let back = parent.compose(&local);
        assert!(close(back.position, world.position));
        assert!((back.scale - world.scale).abs() < 1e-5);
    }

    #[test]
    fn test_forward_follows_rotation() {
        let t = Transform::identity();
        assert!(close(t.forward(), Vector3::new(0.0, 0.0, -1.0)));

        let turned = Transform::new(Vector3::zero(), Quaternion::from_angle_y(Deg(90.0)), 1.0);
        assert!(close(turned.forward(), Vector3::new(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_matrix_places_origin_at_position() {
        let t = Transform::from_position(Vector3::new(3.0, -1.0, 0.5)).with_scale(2.0);
        let m: [[f32; 4]; 4] = t.to_matrix().into();
        assert_eq!(m[3][0], 3.0);
        assert_eq!(m[3][1], -1.0);
        assert_eq!(m[3][2], 0.5);
    }
}
