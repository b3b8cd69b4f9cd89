use cgmath::{Quaternion, Vector3};
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::config::SandboxConfig;
use crate::error::AppError;
use crate::gfx::{camera::DesktopCamera, render::LogRenderer, scene::Transform};
use crate::input::{
    FrameInput, GamepadState, Handedness, InputEvent, InputEventKind, InputSourceKind,
    TrackedSource,
};
use crate::session::Session;

/// Desktop host for the sandbox.
///
/// Without a headset the mouse plays the right controller: its ray comes from
/// the cursor through a fixed [`DesktopCamera`]. Left mouse is the trigger,
/// right mouse the squeeze, `Delete` the secondary button, `W`/`S` and `Q`/`E`
/// the thumbstick. `M`, `R` and `Escape` stand in for the menu buttons.
pub struct SandboxApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    session: Session,
    camera: DesktopCamera,
    renderer: LogRenderer,
    screen_size: (f32, f32),
    mouse: Option<(f32, f32)>,
    trigger_held: bool,
    move_keys: AxisKeys,
    color_keys: AxisKeys,
    started: Instant,
    last_frame: Instant,
}

/// Two opposing keys folded into one thumbstick axis
#[derive(Debug, Clone, Copy, Default)]
struct AxisKeys {
    negative: bool,
    positive: bool,
}

impl AxisKeys {
    fn value(self) -> f32 {
        match (self.negative, self.positive) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

impl SandboxApp {
    pub fn new(config: SandboxConfig) -> Result<Self, AppError> {
        let session = Session::new(config)?;
        let event_loop = EventLoop::new()?;
        let now = Instant::now();

        Ok(Self {
            event_loop,
            app_state: AppState {
                window: None,
                session,
                camera: DesktopCamera::default(),
                renderer: LogRenderer::default(),
                screen_size: (1200.0, 800.0),
                mouse: None,
                trigger_held: false,
                move_keys: AxisKeys::default(),
                color_keys: AxisKeys::default(),
                started: now,
                last_frame: now,
            },
        })
    }

    /// Run the application until the session ends or the window closes
    pub fn run(self) -> Result<(), AppError> {
        let SandboxApp {
            event_loop,
            mut app_state,
        } = self;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut app_state)?;
        log::info!(
            "desktop host stopped after {} frame(s)",
            app_state.session.frame_count()
        );
        Ok(())
    }
}

impl AppState {
    /// Pose of the emulated right controller, aimed through the cursor
    fn controller_pose(&self) -> Option<Transform> {
        let ray = self.camera.screen_to_ray(self.mouse?, self.screen_size);
        let rotation = Quaternion::from_arc(-Vector3::unit_z(), ray.direction, None);
        Some(Transform::new(ray.origin, rotation, 1.0))
    }

    fn controller(&self) -> Option<TrackedSource> {
        let layout = self.session.config().gamepad;
        let gamepad = GamepadState::default()
            .with_axis(layout.color_axis, self.color_keys.value())
            .with_axis(layout.move_axis, self.move_keys.value());

        Some(
            TrackedSource::new(Handedness::Right, InputSourceKind::Controller)
                .with_pose(self.controller_pose()?)
                .with_gamepad(gamepad)
                .engaged(self.trigger_held),
        )
    }

    fn send(&mut self, kind: InputEventKind) {
        let mut event = InputEvent::new(Handedness::Right, kind, InputSourceKind::Controller);
        if let Some(pose) = self.controller_pose() {
            event = event.with_pose(pose);
        }
        let routed = self.session.handle_event(&event);
        log::debug!("{kind:?} -> {routed:?}");
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(key_code) = event.physical_key else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;

        match key_code {
            KeyCode::KeyW => self.move_keys.negative = pressed,
            KeyCode::KeyS => self.move_keys.positive = pressed,
            KeyCode::KeyQ => self.color_keys.negative = pressed,
            KeyCode::KeyE => self.color_keys.positive = pressed,
            _ if !pressed || event.repeat => {}
            KeyCode::Delete => self.send(InputEventKind::SecondaryActionStart),
            KeyCode::KeyM => self.session.toggle_connection_mode(),
            KeyCode::KeyR => self.session.reset(),
            KeyCode::Escape => self.session.request_exit(),
            _ => {}
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let delta_time = now.duration_since(self.last_frame).as_secs_f32();
        let elapsed = now.duration_since(self.started).as_secs_f64();
        self.last_frame = now;

        let mut input = FrameInput::new();
        if let Some(controller) = self.controller() {
            input = input.with_source(controller);
        }
        self.session
            .on_frame(delta_time, elapsed, &input, &mut self.renderer);

        if self.session.is_ended() {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(
            WindowAttributes::default()
                .with_title("cubelink")
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            Ok(window) => {
                let window_handle = Arc::new(window);
                let size = window_handle.inner_size();
                self.screen_size = (size.width as f32, size.height as f32);
                self.camera.set_aspect(self.screen_size.0, self.screen_size.1);
                self.window = Some(window_handle);
            }
            Err(err) => {
                log::error!("could not create window: {err}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse = Some((position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.mouse = None,
            WindowEvent::MouseInput { state, button, .. } => {
                match (button, state) {
                    (MouseButton::Left, ElementState::Pressed) => {
                        self.trigger_held = true;
                        self.send(InputEventKind::GestureStart);
                    }
                    (MouseButton::Left, ElementState::Released) => {
                        self.trigger_held = false;
                        self.send(InputEventKind::GestureEnd);
                    }
                    (MouseButton::Right, ElementState::Pressed) => {
                        self.send(InputEventKind::SqueezeStart)
                    }
                    _ => {}
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.screen_size = (width as f32, height as f32);
                self.camera.set_aspect(self.screen_size.0, self.screen_size.1);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AxisKeys;

    #[test]
    fn test_releasing_one_key_keeps_the_other() {
        let mut keys = AxisKeys::default();
        keys.negative = true;
        keys.positive = true;
        assert_eq!(keys.value(), 0.0);

        keys.negative = false;
        assert_eq!(keys.value(), 1.0);

        keys.positive = false;
        assert_eq!(keys.value(), 0.0);
    }
}
