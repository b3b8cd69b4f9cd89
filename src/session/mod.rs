//! # Session
//!
//! A [`Session`] owns the whole sandbox state for one immersive session: the
//! world (cubes and connections), both hands' interaction state, the menu and
//! the deferred-action scheduler. The host drives it through two entry points
//! that never overlap:
//!
//! - [`Session::handle_event`] for each discrete input event
//! - [`Session::on_frame`] once per rendered frame
//!
//! ## Usage
//!
//! ```rust
//! use cubelink::config::SandboxConfig;
//! use cubelink::gfx::render::LogRenderer;
//! use cubelink::input::FrameInput;
//! use cubelink::Session;
//!
//! let mut session = Session::new(SandboxConfig::default()).unwrap();
//! let mut renderer = LogRenderer::default();
//! session.on_frame(1.0 / 72.0, 0.0, &FrameInput::new(), &mut renderer);
//! assert!(!session.is_ended());
//! ```

mod frame;
pub mod schedule;
pub mod world;

use cgmath::Vector3;

use crate::config::SandboxConfig;
use crate::error::ConfigError;
use crate::graph::ConnectionGraph;
use crate::input::{InputEvent, InputSampler};
use crate::interaction::{ColorPalette, EventRouter, Interaction, Routed};
use crate::ui::{Menu, UiElement};

pub use schedule::{ScheduledAction, Scheduler};
pub use world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    /// Exit requested; the session ends once the exit delay passes
    Ending,
    Ended,
}

pub struct Session {
    config: SandboxConfig,
    world: World,
    interaction: Interaction,
    sampler: InputSampler,
    menu: Menu,
    scheduler: Scheduler,
    status: SessionStatus,
    initial_message: Option<String>,
    elapsed: f64,
    frame_count: u64,
}

impl Session {
    pub fn new(config: SandboxConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let menu = Menu::standard(config.cursor_neutral_distance);
        log::info!("session started ({} palette colours)", config.palette.len());

        Ok(Self {
            world: World::new(ConnectionGraph::new(config.duplicate_policy)),
            interaction: Interaction::new(ColorPalette::new(config.palette.clone())),
            sampler: InputSampler::new(),
            initial_message: menu.message().map(str::to_string),
            menu,
            scheduler: Scheduler::new(),
            status: SessionStatus::Running,
            elapsed: 0.0,
            frame_count: 0,
            config,
        })
    }

    /// Route one discrete input event. Ignored once the session has ended.
    pub fn handle_event(&mut self, event: &InputEvent) -> Routed {
        if self.status == SessionStatus::Ended {
            return Routed::Ignored;
        }
        EventRouter {
            interaction: &mut self.interaction,
            world: &mut self.world,
            sampler: &mut self.sampler,
            menu: &self.menu,
            config: &self.config,
        }
        .route(event)
    }

    /// Clear every cube, connection, selection and hand state. The session
    /// keeps running.
    pub fn reset(&mut self) {
        self.world.clear();
        self.interaction.reset();
        if self.status == SessionStatus::Running {
            if let Some(message) = &self.initial_message {
                self.menu.set_message(message);
            }
        }
        log::info!("session reset");
    }

    /// Show the exit message and end the session after the configured delay.
    /// Repeated requests while ending change nothing.
    pub fn request_exit(&mut self) {
        if self.status != SessionStatus::Running {
            return;
        }
        self.menu.set_message(&self.config.exit_message);
        let at = self.elapsed + f64::from(self.config.exit_delay);
        self.scheduler.schedule(at, ScheduledAction::EndSession);
        self.status = SessionStatus::Ending;
        log::info!("exit requested, ending in {:.1}s", self.config.exit_delay);
    }

    pub fn toggle_connection_mode(&mut self) {
        let graph = &mut self.world.graph;
        if graph.in_connection_mode() {
            graph.exit_connection_mode();
        } else {
            graph.enter_connection_mode();
        }
        log::info!("connection mode {}", if graph.in_connection_mode() { "on" } else { "off" });
    }

    pub fn is_ended(&self) -> bool {
        self.status == SessionStatus::Ended
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn sampler(&self) -> &InputSampler {
        &self.sampler
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Anchor recorded by the calibration target, once touched
    pub fn calibration(&self) -> Option<Vector3<f32>> {
        self.menu.elements().iter().find_map(|element| match element {
            UiElement::CalibrationTarget(target) => target.anchor,
            _ => None,
        })
    }
}
