//! The per-frame tick.

use crate::gfx::render::{ButtonView, CubeInstance, CursorView, FrameRenderer, FrameView, LineVertex};
use crate::input::{FrameInput, Handedness, PoseSource};
use crate::session::schedule::ScheduledAction;
use crate::session::{Session, SessionStatus};
use crate::ui::{ButtonAction, UiEvent};

impl Session {
    /// Advance the session by one rendered frame.
    ///
    /// Steps run strictly in order: sample input, cycle preview colours,
    /// move or delete grabbed cubes, rewrite connection lines, apply
    /// two-handed scaling, evaluate the menu and due scheduled actions, then
    /// hand the frame to `renderer`.
    pub fn on_frame(
        &mut self,
        delta_time: f32,
        elapsed: f64,
        input: &FrameInput,
        renderer: &mut dyn FrameRenderer,
    ) {
        if self.status == SessionStatus::Ended {
            return;
        }
        self.elapsed = elapsed;
        self.frame_count += 1;

        // (1) input
        self.sampler.sample(input);
        self.world.registry.refresh_world(&self.sampler);

        // (2) preview colour
        for hand in Handedness::ALL {
            self.interaction
                .update_preview(hand, &self.sampler, &self.config);
        }

        // (3) grab movement and deletion
        for hand in Handedness::ALL {
            self.interaction.update_grab(
                hand,
                &mut self.world,
                &self.sampler,
                &self.config,
                delta_time,
            );
        }

        // (4) connection lines
        self.world.graph.sync_lines(&self.world.registry);

        // (5) scaling
        self.interaction
            .update_scaling(&mut self.world, &self.sampler, &self.config);

        for event in self.menu.update(&self.sampler) {
            match event {
                UiEvent::Action(ButtonAction::ToggleConnectionMode) => self.toggle_connection_mode(),
                UiEvent::Action(ButtonAction::Reset) => self.reset(),
                UiEvent::Action(ButtonAction::Exit) => self.request_exit(),
                // The anchor stays readable through `Session::calibration`
                UiEvent::Calibrated(anchor) => {
                    log::debug!("calibration anchor set at frame {}: {anchor:?}", self.frame_count)
                }
            }
        }

        for action in self.scheduler.due(elapsed) {
            match action {
                ScheduledAction::EndSession => {
                    self.status = SessionStatus::Ended;
                    log::info!("session ended after {} frame(s)", self.frame_count);
                }
            }
        }

        // (6) render
        renderer.render(&self.frame_view());
    }

    /// Snapshot of everything visible this frame
    pub fn frame_view(&self) -> FrameView {
        let palette = self.interaction.palette();
        let previews = Handedness::ALL
            .into_iter()
            .filter_map(|hand| {
                let preview = self.interaction.preview(hand)?;
                let world = self
                    .sampler
                    .hand_pose(hand)
                    .map(|pose| preview.world(&pose))
                    .or(preview.last_world)?;
                Some(CubeInstance::new(&world, palette.color(preview.cycler.index), [0.0; 3]))
            })
            .collect();

        let cursors = Handedness::ALL
            .into_iter()
            .filter_map(|hand| {
                let cursor = self.menu.cursor(hand);
                let ray = cursor.ray?;
                Some(CursorView {
                    origin: ray.origin,
                    tip: ray.point_at(cursor.distance),
                })
            })
            .collect();

        FrameView {
            frame: self.frame_count,
            cubes: self.world.registry.iter().map(CubeInstance::from_object).collect(),
            previews,
            lines: self
                .world
                .graph
                .connections()
                .iter()
                .flat_map(|connection| LineVertex::segment(&connection.line))
                .collect(),
            buttons: self
                .menu
                .buttons()
                .map(|button| ButtonView {
                    label: button.label.clone(),
                    center: button.bounds.center(),
                    scale: button.display_scale(self.config.button_hover_scale),
                })
                .collect(),
            cursors,
            message: self.menu.message().map(str::to_string),
            selected: self.world.graph.selection().items().to_vec(),
            connection_mode: self.world.graph.in_connection_mode(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SandboxConfig;
    use crate::gfx::render::{FrameRenderer, FrameView};
    use crate::gfx::scene::{Material, Transform};
    use crate::input::{FrameInput, GamepadState, Handedness, InputSourceKind, TrackedSource};
    use crate::session::Session;
    use cgmath::{InnerSpace, Vector3};

    #[derive(Default)]
    struct Capture {
        frames: Vec<FrameView>,
    }

    impl FrameRenderer for Capture {
        fn render(&mut self, frame: &FrameView) {
            self.frames.push(frame.clone());
        }
    }

    #[test]
    fn test_lines_follow_moved_endpoint() {
        let mut session = Session::new(SandboxConfig::default()).unwrap();
        let a = session.world.registry.spawn(
            Transform::from_position(Vector3::new(0.0, 1.0, -0.5)),
            0.05,
            Material::new([1.0; 3]),
        );
        let b = session.world.registry.spawn(
            Transform::from_position(Vector3::new(0.5, 1.0, -0.5)),
            0.05,
            Material::new([1.0; 3]),
        );
        session.world.graph.connect(a, b, &session.world.registry);
        session.world.registry.get_mut(b).unwrap().world.position = Vector3::new(0.5, 2.0, -0.5);
        session.world.registry.get_mut(b).unwrap().local.position = Vector3::new(0.5, 2.0, -0.5);

        let mut capture = Capture::default();
        session.on_frame(0.016, 0.016, &FrameInput::new(), &mut capture);

        let frame = &capture.frames[0];
        assert_eq!(frame.lines.len(), 2);
        assert_eq!(frame.lines[1].position, [0.5, 2.0, -0.5]);
    }

    #[test]
    fn test_preview_rendered_with_cycled_colour() {
        let mut session = Session::new(SandboxConfig::default()).unwrap();
        let controller = |axis: f32| {
            FrameInput::new().with_source(
                TrackedSource::new(Handedness::Left, InputSourceKind::Controller)
                    .with_pose(Transform::from_position(Vector3::new(-0.3, 1.0, 0.0)))
                    .with_gamepad(GamepadState::default().with_axis(2, axis)),
            )
        };
        let mut capture = Capture::default();
        session.on_frame(0.016, 0.016, &controller(0.0), &mut capture);
        session
            .interaction
            .gesture_start(Handedness::Left, None, &mut session.world, &session.sampler, &session.config);
        session.on_frame(0.016, 0.032, &controller(-0.9), &mut capture);

        let frame = capture.frames.last().unwrap();
        assert_eq!(frame.previews.len(), 1);
        // Retreat from red wraps to blue
        assert_eq!(frame.previews[0].color, [0.0, 0.0, 1.0, 1.0]);
        assert!(frame.cubes.is_empty());
    }

    #[test]
    fn test_grabbed_cube_pushed_along_forward() {
        let mut session = Session::new(SandboxConfig::default()).unwrap();
        let id = session.world.registry.spawn(
            Transform::from_position(Vector3::new(0.0, 1.0, -0.5)),
            0.05,
            Material::new([1.0; 3]),
        );
        let controller = |axis: f32| {
            FrameInput::new().with_source(
                TrackedSource::new(Handedness::Right, InputSourceKind::Controller)
                    .with_pose(Transform::from_position(Vector3::new(0.0, 1.0, 0.0)))
                    .with_gamepad(GamepadState::default().with_axis(3, axis)),
            )
        };
        let mut capture = Capture::default();
        session.on_frame(0.1, 0.1, &controller(0.0), &mut capture);
        session
            .interaction
            .gesture_start(Handedness::Right, Some(id), &mut session.world, &session.sampler, &session.config);

        for frame in 0..5 {
            session.on_frame(0.1, 0.2 + frame as f64 * 0.1, &controller(-1.0), &mut capture);
        }
        let position = session.world.registry.world_position(id).unwrap();
        assert!((position - Vector3::new(0.0, 1.0, -1.0)).magnitude() < 1e-4);
    }
}
