//! Selection/grab state machine.
//!
//! Each hand is independently `Idle`, `Previewing` a cube it is about to
//! spawn, or `Grabbing` a live cube. A second hand starting a gesture on the
//! cube the other hand holds joins a two-handed `Scaling` of that cube.
//!
//! ```text
//! Idle --start (no hit)--> Previewing --end--> Idle   (cube committed)
//! Idle --start (hit)-----> Grabbing   --end--> Idle   (cube released)
//! Idle --start (hit on other hand's cube)--> Scaling --end (either hand)--> ...
//! ```
//!
//! Transitions that do not apply to the current state are ignored.

use cgmath::InnerSpace;

use crate::config::SandboxConfig;
use crate::gfx::scene::{Material, ObjectId, Parent, Transform};
use crate::input::{Handedness, InputSampler, PoseSource};
use crate::interaction::hand::{GrabState, HandMode, PendingSpawnPreview, ScalingState};
use crate::interaction::palette::{ColorPalette, CycleStep};
use crate::session::world::World;

/// What a transition did, for the caller's logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    PreviewStarted,
    Committed(ObjectId),
    Grabbed(ObjectId),
    Released(ObjectId),
    ScalingStarted(ObjectId),
    ScalingStopped(ObjectId),
    Deleted(ObjectId),
}

#[derive(Debug)]
pub struct Interaction {
    hands: [HandMode; 2],
    scaling: Option<ScalingState>,
    palette: ColorPalette,
}

impl Interaction {
    pub fn new(palette: ColorPalette) -> Self {
        Self {
            hands: [HandMode::Idle; 2],
            scaling: None,
            palette,
        }
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn mode(&self, hand: Handedness) -> &HandMode {
        &self.hands[hand.index()]
    }

    pub fn grabbed(&self, hand: Handedness) -> Option<ObjectId> {
        self.mode(hand).grabbed()
    }

    pub fn preview(&self, hand: Handedness) -> Option<&PendingSpawnPreview> {
        match self.mode(hand) {
            HandMode::Previewing(preview) => Some(preview),
            _ => None,
        }
    }

    pub fn scaling(&self) -> Option<&ScalingState> {
        self.scaling.as_ref()
    }

    /// Hand currently grabbing `id`, if any
    pub fn holder_of(&self, id: ObjectId) -> Option<Handedness> {
        Handedness::ALL
            .into_iter()
            .find(|hand| self.grabbed(*hand) == Some(id))
    }

    /// Gesture start on `hand`. `hit` is the object the hand's hit strategy
    /// picked, if any.
    pub fn gesture_start(
        &mut self,
        hand: Handedness,
        hit: Option<ObjectId>,
        world: &mut World,
        sampler: &InputSampler,
        config: &SandboxConfig,
    ) -> Transition {
        if !self.mode(hand).is_idle() {
            return Transition::None;
        }

        match hit {
            Some(id) if self.grabbed(hand.opposite()) == Some(id) => {
                self.start_scaling(hand, id, world, sampler)
            }
            Some(id) => self.grab(hand, id, world, sampler, config),
            None => self.start_preview(hand, sampler, config),
        }
    }

    /// Gesture end on `hand`
    pub fn gesture_end(
        &mut self,
        hand: Handedness,
        world: &mut World,
        sampler: &InputSampler,
        config: &SandboxConfig,
    ) -> Transition {
        let mode = self.hands[hand.index()];
        match mode {
            HandMode::Idle => Transition::None,
            HandMode::Previewing(preview) => self.commit_preview(hand, preview, world, sampler, config),
            HandMode::Grabbing(grab) => {
                if self.scaling.is_some_and(|s| s.grabbing_hand == hand) {
                    self.stop_scaling();
                }
                self.release(hand, grab, world, sampler);
                Transition::Released(grab.grabbed_object)
            }
            HandMode::Scaling => match self.stop_scaling() {
                Some(target) => Transition::ScalingStopped(target),
                None => {
                    self.hands[hand.index()] = HandMode::Idle;
                    Transition::None
                }
            },
        }
    }

    /// Delete the object held by `hand`, cascading to its connections
    pub fn delete_grabbed(
        &mut self,
        hand: Handedness,
        world: &mut World,
        sampler: &InputSampler,
    ) -> Transition {
        let HandMode::Grabbing(grab) = self.hands[hand.index()] else {
            return Transition::None;
        };
        let id = grab.grabbed_object;

        if self.scaling.is_some_and(|s| s.target_object == id) {
            self.stop_scaling();
        }
        world.registry.attach(id, Parent::Root, sampler);
        world.delete_object(id);
        self.hands[hand.index()] = HandMode::Idle;
        Transition::Deleted(id)
    }

    /// Per-frame: step the preview colour on an axis threshold crossing and
    /// remember where the preview is in case tracking drops
    pub fn update_preview(&mut self, hand: Handedness, sampler: &InputSampler, config: &SandboxConfig) -> Option<CycleStep> {
        let HandMode::Previewing(preview) = &mut self.hands[hand.index()] else {
            return None;
        };

        if let Some(pose) = sampler.hand_pose(hand) {
            preview.last_world = Some(preview.world(&pose));
        }

        sampler.gamepad(hand)?;
        let (previous, current) = sampler.axis_pair(hand, config.gamepad.color_axis);
        let step = preview
            .cycler
            .update(previous, current, config.axis_threshold, &self.palette);
        if let Some(step) = step {
            log::debug!("{hand:?} preview colour {step:?} -> {}", preview.cycler.index);
        }
        step
    }

    /// Per-frame: push/pull the grabbed object along the controller's forward
    /// axis, and delete it on a rising edge of the delete button
    pub fn update_grab(
        &mut self,
        hand: Handedness,
        world: &mut World,
        sampler: &InputSampler,
        config: &SandboxConfig,
        delta_time: f32,
    ) -> Transition {
        let Some(id) = self.grabbed(hand) else {
            return Transition::None;
        };
        if sampler.gamepad(hand).is_none() {
            return Transition::None;
        }

        if sampler.button_pressed_edge(hand, config.gamepad.delete_button) {
            return self.delete_grabbed(hand, world, sampler);
        }

        let (_, axis) = sampler.axis_pair(hand, config.gamepad.move_axis);
        if axis != 0.0 {
            if let Some(pose) = sampler.hand_pose(hand) {
                // Pushing the stick forward reads negative
                let delta = pose.forward() * (-axis * config.move_speed * delta_time);
                world.registry.translate_world(id, delta, sampler);
            }
        }
        Transition::None
    }

    /// Per-frame: apply two-handed scaling from the current hand distance
    pub fn update_scaling(&mut self, world: &mut World, sampler: &InputSampler, config: &SandboxConfig) {
        let Some(scaling) = self.scaling else {
            return;
        };
        if !world.registry.contains(scaling.target_object) {
            self.stop_scaling();
            return;
        }

        let (Some(a), Some(b)) = (
            sampler.reference_point(scaling.grabbing_hand),
            sampler.reference_point(scaling.scaling_hand),
        ) else {
            return;
        };

        let scale = scaling.scale_for((a - b).magnitude(), config.min_scale);
        world
            .registry
            .set_world_scale(scaling.target_object, scale, sampler);
    }

    /// Drop every hand state without touching the world (session reset)
    pub fn reset(&mut self) {
        self.hands = [HandMode::Idle; 2];
        self.scaling = None;
    }

    fn start_preview(&mut self, hand: Handedness, sampler: &InputSampler, config: &SandboxConfig) -> Transition {
        let Some(pose) = sampler.hand_pose(hand) else {
            return Transition::None;
        };

        let mut preview = PendingSpawnPreview::new(Transform::from_position(config.spawn_offset));
        preview.last_world = Some(preview.world(&pose));
        self.hands[hand.index()] = HandMode::Previewing(preview);
        log::debug!("{hand:?} started a spawn preview");
        Transition::PreviewStarted
    }

    fn commit_preview(
        &mut self,
        hand: Handedness,
        preview: PendingSpawnPreview,
        world: &mut World,
        sampler: &InputSampler,
        config: &SandboxConfig,
    ) -> Transition {
        self.hands[hand.index()] = HandMode::Idle;

        let placed = sampler
            .hand_pose(hand)
            .map(|pose| preview.world(&pose))
            .or(preview.last_world);
        let Some(placed) = placed else {
            log::debug!("{hand:?} preview discarded, hand never tracked");
            return Transition::None;
        };

        let material = Material::new(self.palette.color(preview.cycler.index));
        let id = world.registry.spawn(placed, config.bounding_radius, material);
        log::debug!("{hand:?} committed {id}");
        Transition::Committed(id)
    }

    fn grab(
        &mut self,
        hand: Handedness,
        id: ObjectId,
        world: &mut World,
        sampler: &InputSampler,
        config: &SandboxConfig,
    ) -> Transition {
        // Another hand holding it is handled as scaling; a second grab never happens
        if self.holder_of(id).is_some() {
            return Transition::None;
        }
        if !world.registry.attach(id, Parent::Hand(hand), sampler) {
            return Transition::None;
        }
        let Some(object) = world.registry.get_mut(id) else {
            return Transition::None;
        };

        let previous_emissive = object.material.emissive;
        object.material.emissive = config.grab_emissive;
        self.hands[hand.index()] = HandMode::Grabbing(GrabState {
            grabbed_object: id,
            previous_emissive,
        });
        log::debug!("{hand:?} grabbed {id}");
        Transition::Grabbed(id)
    }

    fn release(&mut self, hand: Handedness, grab: GrabState, world: &mut World, sampler: &InputSampler) {
        let id = grab.grabbed_object;
        world.registry.attach(id, Parent::Root, sampler);
        if let Some(object) = world.registry.get_mut(id) {
            object.material.emissive = grab.previous_emissive;
        }
        self.hands[hand.index()] = HandMode::Idle;
        log::debug!("{hand:?} released {id}");
    }

    fn start_scaling(
        &mut self,
        hand: Handedness,
        id: ObjectId,
        world: &World,
        sampler: &InputSampler,
    ) -> Transition {
        if self.scaling.is_some() {
            return Transition::None;
        }
        let grabbing_hand = hand.opposite();
        let (Some(a), Some(b)) = (
            sampler.reference_point(grabbing_hand),
            sampler.reference_point(hand),
        ) else {
            return Transition::None;
        };
        let Some(object) = world.registry.get(id) else {
            return Transition::None;
        };

        self.scaling = Some(ScalingState {
            target_object: id,
            initial_scale: object.world.scale,
            initial_inter_hand_distance: (a - b).magnitude(),
            grabbing_hand,
            scaling_hand: hand,
        });
        self.hands[hand.index()] = HandMode::Scaling;
        log::debug!("started scaling {id}");
        Transition::ScalingStarted(id)
    }

    /// End scaling if active; the object keeps its last scale
    fn stop_scaling(&mut self) -> Option<ObjectId> {
        let scaling = self.scaling.take()?;
        if self.hands[scaling.scaling_hand.index()] == HandMode::Scaling {
            self.hands[scaling.scaling_hand.index()] = HandMode::Idle;
        }
        log::debug!("stopped scaling {}", scaling.target_object);
        Some(scaling.target_object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{FrameInput, GamepadState, InputSourceKind, TrackedSource};
    use cgmath::Vector3;

    struct Rig {
        interaction: Interaction,
        world: World,
        sampler: InputSampler,
        config: SandboxConfig,
    }

    impl Rig {
        fn new() -> Self {
            let config = SandboxConfig::default();
            Self {
                interaction: Interaction::new(ColorPalette::new(config.palette.clone())),
                world: World::default(),
                sampler: InputSampler::new(),
                config,
            }
        }

        fn hands_at(&mut self, left: Vector3<f32>, right: Vector3<f32>) {
            self.sampler.sample(
                &FrameInput::new()
                    .with_source(
                        TrackedSource::new(Handedness::Left, InputSourceKind::Hand)
                            .with_pose(Transform::from_position(left)),
                    )
                    .with_source(
                        TrackedSource::new(Handedness::Right, InputSourceKind::Hand)
                            .with_pose(Transform::from_position(right)),
                    ),
            );
            self.world.registry.refresh_world(&self.sampler);
        }

        fn start(&mut self, hand: Handedness, hit: Option<ObjectId>) -> Transition {
            self.interaction
                .gesture_start(hand, hit, &mut self.world, &self.sampler, &self.config)
        }

        fn end(&mut self, hand: Handedness) -> Transition {
            self.interaction
                .gesture_end(hand, &mut self.world, &self.sampler, &self.config)
        }

        fn spawn_at(&mut self, hand: Handedness) -> ObjectId {
            assert_eq!(self.start(hand, None), Transition::PreviewStarted);
            match self.end(hand) {
                Transition::Committed(id) => id,
                other => panic!("expected commit, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_spawn_commits_at_hand_offset() {
        let mut rig = Rig::new();
        rig.hands_at(Vector3::new(-0.3, 1.0, 0.0), Vector3::new(0.3, 1.0, 0.0));

        let id = rig.spawn_at(Handedness::Right);
        let object = rig.world.registry.get(id).unwrap();
        assert_eq!(object.parent, Parent::Root);
        assert!((object.world.position - Vector3::new(0.3, 1.0, -0.1)).magnitude() < 1e-5);
        assert_eq!(object.material.base_color, [1.0, 0.0, 0.0]);
        assert!(rig.interaction.mode(Handedness::Right).is_idle());
    }

    #[test]
    fn test_grab_highlights_and_release_restores() {
        let mut rig = Rig::new();
        rig.hands_at(Vector3::new(-0.3, 1.0, 0.0), Vector3::new(0.3, 1.0, 0.0));
        let id = rig.spawn_at(Handedness::Right);

        assert_eq!(rig.start(Handedness::Right, Some(id)), Transition::Grabbed(id));
        let object = rig.world.registry.get(id).unwrap();
        assert_eq!(object.parent, Parent::Hand(Handedness::Right));
        assert_eq!(object.material.emissive, rig.config.grab_emissive);
        assert_eq!(rig.interaction.grabbed(Handedness::Right), Some(id));

        // Hand moves, cube follows
        rig.hands_at(Vector3::new(-0.3, 1.0, 0.0), Vector3::new(0.3, 1.5, 0.0));
        assert!((rig.world.registry.world_position(id).unwrap().y - 1.5).abs() < 1e-5);

        assert_eq!(rig.end(Handedness::Right), Transition::Released(id));
        let object = rig.world.registry.get(id).unwrap();
        assert_eq!(object.parent, Parent::Root);
        assert_eq!(object.material.emissive, [0.0; 3]);
        assert!((object.world.position.y - 1.5).abs() < 1e-5);
        assert_eq!(rig.interaction.grabbed(Handedness::Right), None);
    }

    #[test]
    fn test_gesture_end_without_start_is_ignored() {
        let mut rig = Rig::new();
        rig.hands_at(Vector3::new(-0.3, 1.0, 0.0), Vector3::new(0.3, 1.0, 0.0));
        assert_eq!(rig.end(Handedness::Left), Transition::None);
        assert!(rig.world.registry.is_empty());
    }

    #[test]
    fn test_second_start_on_busy_hand_is_ignored() {
        let mut rig = Rig::new();
        rig.hands_at(Vector3::new(-0.3, 1.0, 0.0), Vector3::new(0.3, 1.0, 0.0));
        assert_eq!(rig.start(Handedness::Left, None), Transition::PreviewStarted);
        assert_eq!(rig.start(Handedness::Left, None), Transition::None);
    }

    #[test]
    fn test_untracked_hand_cannot_spawn() {
        let mut rig = Rig::new();
        assert_eq!(rig.start(Handedness::Left, None), Transition::None);
    }

    #[test]
    fn test_two_handed_scaling() {
        let mut rig = Rig::new();
        rig.hands_at(Vector3::new(-0.1, 1.0, 0.0), Vector3::new(0.1, 1.0, 0.0));
        let id = rig.spawn_at(Handedness::Left);

        assert_eq!(rig.start(Handedness::Left, Some(id)), Transition::Grabbed(id));
        assert_eq!(rig.start(Handedness::Right, Some(id)), Transition::ScalingStarted(id));
        let scaling = *rig.interaction.scaling().unwrap();
        assert!((scaling.initial_inter_hand_distance - 0.2).abs() < 1e-5);
        assert_eq!(scaling.initial_scale, 1.0);

        // Hands move 0.5 further apart
        rig.hands_at(Vector3::new(-0.35, 1.0, 0.0), Vector3::new(0.35, 1.0, 0.0));
        rig.interaction
            .update_scaling(&mut rig.world, &rig.sampler, &rig.config);
        let scale = rig.world.registry.get(id).unwrap().world.scale;
        assert!((scale - 1.5).abs() < 1e-4);

        // Scaling hand lets go: the cube keeps its scale and stays grabbed
        assert_eq!(rig.end(Handedness::Right), Transition::ScalingStopped(id));
        assert!(rig.interaction.scaling().is_none());
        assert_eq!(rig.interaction.grabbed(Handedness::Left), Some(id));
        rig.hands_at(Vector3::new(-0.35, 1.0, 0.0), Vector3::new(0.35, 1.0, 0.0));
        assert!((rig.world.registry.get(id).unwrap().world.scale - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_releasing_grabbing_hand_ends_scaling() {
        let mut rig = Rig::new();
        rig.hands_at(Vector3::new(-0.1, 1.0, 0.0), Vector3::new(0.1, 1.0, 0.0));
        let id = rig.spawn_at(Handedness::Left);
        rig.start(Handedness::Left, Some(id));
        rig.start(Handedness::Right, Some(id));

        assert_eq!(rig.end(Handedness::Left), Transition::Released(id));
        assert!(rig.interaction.scaling().is_none());
        assert!(rig.interaction.mode(Handedness::Right).is_idle());
        assert_eq!(rig.end(Handedness::Right), Transition::None);
    }

    #[test]
    fn test_delete_grabbed_cascades() {
        let mut rig = Rig::new();
        rig.hands_at(Vector3::new(-0.3, 1.0, 0.0), Vector3::new(0.3, 1.0, 0.0));
        let a = rig.spawn_at(Handedness::Left);
        let b = rig.spawn_at(Handedness::Right);
        rig.world.graph.connect(a, b, &rig.world.registry);

        rig.start(Handedness::Left, Some(a));
        assert_eq!(
            rig.interaction
                .delete_grabbed(Handedness::Left, &mut rig.world, &rig.sampler),
            Transition::Deleted(a)
        );
        assert!(!rig.world.registry.contains(a));
        assert!(rig.world.registry.contains(b));
        assert!(rig.world.graph.is_empty());
        assert!(rig.interaction.mode(Handedness::Left).is_idle());
    }

    #[test]
    fn test_delete_without_grab_is_ignored() {
        let mut rig = Rig::new();
        assert_eq!(
            rig.interaction
                .delete_grabbed(Handedness::Right, &mut rig.world, &rig.sampler),
            Transition::None
        );
    }

    #[test]
    fn test_preview_colour_cycles_on_axis_edge() {
        let mut rig = Rig::new();
        let controller = |axis: f32| {
            FrameInput::new().with_source(
                TrackedSource::new(Handedness::Right, InputSourceKind::Controller)
                    .with_pose(Transform::identity())
                    .with_gamepad(GamepadState::default().with_axis(2, axis)),
            )
        };

        rig.sampler.sample(&controller(0.0));
        rig.start(Handedness::Right, None);
        for axis in [0.9, 0.9, 0.0, 0.9] {
            rig.sampler.sample(&controller(axis));
            rig.interaction
                .update_preview(Handedness::Right, &rig.sampler, &rig.config);
        }
        assert_eq!(rig.interaction.preview(Handedness::Right).unwrap().cycler.index, 2);

        let Transition::Committed(id) = rig.end(Handedness::Right) else {
            panic!("expected commit");
        };
        assert_eq!(rig.world.registry.get(id).unwrap().material.base_color, [0.0, 0.0, 1.0]);
    }
}
