use std::fmt;

use cgmath::Vector3;

use crate::gfx::picking::Candidate;
use crate::gfx::scene::transform::Transform;
use crate::input::{Handedness, PoseSource};

/// Opaque handle of a spawned object. Handles are never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cube#{}", self.0)
    }
}

/// Which transform an object's local transform is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parent {
    #[default]
    Root,
    Hand(Handedness),
}

/// Surface properties the renderer needs per cube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub base_color: [f32; 3],
    /// Emissive tint, used as the grab highlight
    pub emissive: [f32; 3],
}

impl Material {
    pub fn new(base_color: [f32; 3]) -> Self {
        Self {
            base_color,
            emissive: [0.0; 3],
        }
    }
}

/// A live cube in the world
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedObject {
    pub id: ObjectId,
    pub parent: Parent,
    /// Transform relative to `parent`
    pub local: Transform,
    /// Cached world transform, refreshed every frame and on every mutation
    pub world: Transform,
    /// Bounding radius at scale 1.0
    pub bounding_radius: f32,
    pub material: Material,
}

impl SpawnedObject {
    /// Radius used for hit-testing at the current scale
    pub fn scaled_radius(&self) -> f32 {
        self.bounding_radius * self.world.scale.abs()
    }

    pub fn position(&self) -> Vector3<f32> {
        self.world.position
    }
}

/// Owns every live spawned object.
///
/// Objects are kept in spawn order; iteration order is the order the proximity
/// hit-test uses to break ties.
#[derive(Debug, Default)]
pub struct SpatialRegistry {
    objects: Vec<SpawnedObject>,
    next_id: u64,
}

impl SpatialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a new object at a world transform, parented to the root
    pub fn spawn(&mut self, world: Transform, bounding_radius: f32, material: Material) -> ObjectId {
        self.next_id += 1;
        let id = ObjectId(self.next_id);
        self.objects.push(SpawnedObject {
            id,
            parent: Parent::Root,
            local: world,
            world,
            bounding_radius,
            material,
        });
        id
    }

    /// Remove an object, returning it if it was live
    pub fn remove(&mut self, id: ObjectId) -> Option<SpawnedObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(index))
    }

    pub fn get(&self, id: ObjectId) -> Option<&SpawnedObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SpawnedObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpawnedObject> {
        self.objects.iter()
    }

    pub fn world_position(&self, id: ObjectId) -> Option<Vector3<f32>> {
        self.get(id).map(SpawnedObject::position)
    }

    /// Re-parent an object while preserving its world transform.
    ///
    /// Attaching to a hand whose pose is not tracked is refused and returns
    /// `false`; the object stays where it is.
    pub fn attach(&mut self, id: ObjectId, parent: Parent, poses: &impl PoseSource) -> bool {
        let parent_world = match parent {
            Parent::Root => Transform::identity(),
            Parent::Hand(hand) => match poses.hand_pose(hand) {
                Some(pose) => pose,
                None => return false,
            },
        };

        let Some(object) = self.get_mut(id) else {
            return false;
        };
        object.local = parent_world.relative(&object.world);
        object.parent = parent;
        true
    }

    /// Recompute the world transform of every hand-parented object.
    /// Objects whose hand is untracked this frame keep their last world transform.
    pub fn refresh_world(&mut self, poses: &impl PoseSource) {
        for object in &mut self.objects {
            match object.parent {
                Parent::Root => object.world = object.local,
                Parent::Hand(hand) => {
                    if let Some(pose) = poses.hand_pose(hand) {
                        object.world = pose.compose(&object.local);
                    }
                }
            }
        }
    }

    /// Move an object by a world-space offset
    pub fn translate_world(&mut self, id: ObjectId, delta: Vector3<f32>, poses: &impl PoseSource) {
        let Some(object) = self.get_mut(id) else {
            return;
        };
        object.world.position += delta;
        Self::sync_local(object, poses);
    }

    /// Set the uniform world scale of an object
    pub fn set_world_scale(&mut self, id: ObjectId, scale: f32, poses: &impl PoseSource) {
        let Some(object) = self.get_mut(id) else {
            return;
        };
        object.world.scale = scale;
        Self::sync_local(object, poses);
    }

    fn sync_local(object: &mut SpawnedObject, poses: &impl PoseSource) {
        object.local = match object.parent {
            Parent::Root => object.world,
            Parent::Hand(hand) => match poses.hand_pose(hand) {
                Some(pose) => pose.relative(&object.world),
                None => return,
            },
        };
    }

    /// Hit-test candidates in iteration order
    pub fn candidates(&self) -> Vec<Candidate> {
        self.objects
            .iter()
            .map(|o| Candidate {
                object_id: o.id,
                center: o.world.position,
                radius: o.scaled_radius(),
            })
            .collect()
    }

    /// Drop every object (session reset)
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
