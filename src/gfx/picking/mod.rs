//! # Object Picking System
//!
//! This module decides which cube an input source is pointing at or touching.
//! Two interchangeable strategies exist, selected by the kind of input source:
//!
//! 1. **Ray** (controllers): cast a ray from the controller along its forward
//!    axis and return the *nearest* cube whose bounding sphere it intersects
//! 2. **Proximity** (tracked hands): return the *first* cube, in registry order,
//!    whose scaled bounding sphere contains the fingertip
//!
//! ## Usage
//!
//! ```rust
//! use cubelink::gfx::picking::{Candidate, HitStrategy};
//! use cubelink::input::{Handedness, InputSourceKind, TrackedSource};
//! use cubelink::gfx::scene::Transform;
//!
//! let source = TrackedSource::new(Handedness::Right, InputSourceKind::Controller)
//!     .with_pose(Transform::identity());
//! let candidates: Vec<Candidate> = Vec::new();
//! let hit = source.kind.hit_strategy().pick(&source, &candidates);
//! assert!(hit.is_none());
//! ```

use cgmath::{ElementWise, InnerSpace, Vector3};

use crate::gfx::scene::ObjectId;
use crate::input::{InputSource, InputSourceKind};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Test ray-sphere intersection.
    /// Returns the distance to the first surface hit in front of the origin;
    /// an origin inside the sphere reports distance 0.
    pub fn intersect_sphere(&self, center: Vector3<f32>, radius: f32) -> Option<f32> {
        let to_center = center - self.origin;
        let c = to_center.magnitude2() - radius * radius;
        if c <= 0.0 {
            return Some(0.0);
        }

        let b = to_center.dot(self.direction);
        if b < 0.0 {
            return None;
        }

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        Some(b - discriminant.sqrt())
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl AABB {
    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create an AABB from its center and half extents
    pub fn from_center(center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Test ray-AABB intersection
    /// Returns the distance to intersection point, or None if no intersection
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }
}

/// A cube as seen by the hit-test: its world center and scaled bounding radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub object_id: ObjectId,
    pub center: Vector3<f32>,
    pub radius: f32,
}

/// Result of an object picking operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    /// Object that was hit
    pub object_id: ObjectId,
    /// Ray distance (ray mode) or fingertip-to-center distance (proximity mode)
    pub distance: f32,
    /// World space point the hit was registered at
    pub intersection_point: Vector3<f32>,
}

/// A way of deciding which candidate an input source is interacting with
pub trait HitStrategy {
    fn name(&self) -> &'static str;

    /// Pick among `candidates` for `source`. Untracked sources pick nothing.
    fn pick(&self, source: &dyn InputSource, candidates: &[Candidate]) -> Option<PickResult>;
}

/// Nearest intersection along the source's forward ray
#[derive(Debug, Clone, Copy, Default)]
pub struct RayStrategy;

/// First candidate whose bounding sphere contains the source's reference point
#[derive(Debug, Clone, Copy, Default)]
pub struct ProximityStrategy;

static RAY_STRATEGY: RayStrategy = RayStrategy;
static PROXIMITY_STRATEGY: ProximityStrategy = ProximityStrategy;

impl InputSourceKind {
    /// The hit-test strategy used for this kind of source
    pub fn hit_strategy(self) -> &'static dyn HitStrategy {
        match self {
            InputSourceKind::Controller => &RAY_STRATEGY,
            InputSourceKind::Hand => &PROXIMITY_STRATEGY,
        }
    }
}

/// Ray cast from a source's pose along its local forward axis
pub fn source_ray(source: &dyn InputSource) -> Option<Ray> {
    source
        .pose()
        .map(|pose| Ray::new(pose.position, pose.forward()))
}

impl HitStrategy for RayStrategy {
    fn name(&self) -> &'static str {
        "ray"
    }

    fn pick(&self, source: &dyn InputSource, candidates: &[Candidate]) -> Option<PickResult> {
        let ray = source_ray(source)?;

        let mut closest_result: Option<PickResult> = None;
        for candidate in candidates {
            if let Some(distance) = ray.intersect_sphere(candidate.center, candidate.radius) {
                // Keep the closest intersection; ties go to the earlier candidate
                if closest_result
                    .as_ref()
                    .map_or(true, |result| distance < result.distance)
                {
                    closest_result = Some(PickResult {
                        object_id: candidate.object_id,
                        distance,
                        intersection_point: ray.point_at(distance),
                    });
                }
            }
        }

        closest_result
    }
}

impl HitStrategy for ProximityStrategy {
    fn name(&self) -> &'static str {
        "proximity"
    }

    fn pick(&self, source: &dyn InputSource, candidates: &[Candidate]) -> Option<PickResult> {
        let point = source.reference_point()?;

        candidates.iter().find_map(|candidate| {
            let distance = (point - candidate.center).magnitude();
            (distance < candidate.radius).then_some(PickResult {
                object_id: candidate.object_id,
                distance,
                intersection_point: point,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Zero;
    use crate::gfx::scene::{Material, SpatialRegistry, Transform};
    use crate::input::{Handedness, TrackedSource};

    fn candidates_at(positions: &[Vector3<f32>], radius: f32) -> (SpatialRegistry, Vec<Candidate>) {
        let mut registry = SpatialRegistry::new();
        for p in positions {
            registry.spawn(Transform::from_position(*p), radius, Material::new([1.0; 3]));
        }
        let candidates = registry.candidates();
        (registry, candidates)
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = AABB::new(
            Vector3::new(-1.0, -1.0, -1.0),
            Vector3::new(1.0, 1.0, 1.0),
        );

        // Ray hitting the box
        let ray = Ray::new(
            Vector3::new(0.0, 0.0, -5.0),
            Vector3::new(0.0, 0.0, 1.0),
        );

        assert!(aabb.intersect_ray(&ray).is_some());

        // Ray missing the box
        let ray_miss = Ray::new(
            Vector3::new(5.0, 0.0, -5.0),
            Vector3::new(0.0, 0.0, 1.0),
        );

        assert!(aabb.intersect_ray(&ray_miss).is_none());
    }

    #[test]
    fn test_ray_sphere_distance() {
        let ray = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
        let distance = ray
            .intersect_sphere(Vector3::new(0.0, 0.0, -2.0), 0.5)
            .unwrap();
        assert!((distance - 1.5).abs() < 1e-5);

        // Behind the origin
        assert!(ray.intersect_sphere(Vector3::new(0.0, 0.0, 2.0), 0.5).is_none());
    }

    #[test]
    fn test_ray_strategy_picks_nearest() {
        let (_registry, candidates) = candidates_at(
            &[Vector3::new(0.0, 0.0, -3.0), Vector3::new(0.0, 0.0, -1.0)],
            0.1,
        );
        let source = TrackedSource::new(Handedness::Right, InputSourceKind::Controller)
            .with_pose(Transform::identity());

        let hit = RayStrategy.pick(&source, &candidates).unwrap();
        assert_eq!(hit.object_id, candidates[1].object_id);
    }

    #[test]
    fn test_proximity_strategy_picks_first_match() {
        // Both spheres contain the fingertip; the nearer one was spawned second
        let (_registry, candidates) = candidates_at(
            &[Vector3::new(0.05, 0.0, 0.0), Vector3::new(0.01, 0.0, 0.0)],
            0.1,
        );
        let source = TrackedSource::new(Handedness::Left, InputSourceKind::Hand)
            .with_reference_point(Vector3::zero());

        let hit = ProximityStrategy.pick(&source, &candidates).unwrap();
        assert_eq!(hit.object_id, candidates[0].object_id);
    }

    #[test]
    fn test_proximity_requires_point_inside_radius() {
        let (_registry, candidates) = candidates_at(&[Vector3::new(0.2, 0.0, 0.0)], 0.1);
        let source = TrackedSource::new(Handedness::Left, InputSourceKind::Hand)
            .with_reference_point(Vector3::zero());
        assert!(ProximityStrategy.pick(&source, &candidates).is_none());
    }

    #[test]
    fn test_untracked_source_picks_nothing() {
        let (_registry, candidates) = candidates_at(&[Vector3::zero()], 1.0);
        let source = TrackedSource::new(Handedness::Left, InputSourceKind::Controller);
        assert!(RayStrategy.pick(&source, &candidates).is_none());
        assert!(ProximityStrategy.pick(&source, &candidates).is_none());
    }

    #[test]
    fn test_strategy_selected_by_kind() {
        assert_eq!(InputSourceKind::Controller.hit_strategy().name(), "ray");
        assert_eq!(InputSourceKind::Hand.hit_strategy().name(), "proximity");
    }
}
