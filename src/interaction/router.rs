//! Maps discrete input events to state-machine transitions.
//!
//! The router owns no state. It borrows the session's parts for the length of
//! one event, hit-tests with the strategy of the event's source kind and calls
//! the matching transition. Ray sources pointing at a menu button hand the
//! gesture to the menu, which picks up the press on the next frame.

use crate::config::SandboxConfig;
use crate::gfx::picking::source_ray;
use crate::gfx::scene::ObjectId;
use crate::graph::SelectionEvent;
use crate::input::{Handedness, InputEvent, InputEventKind, InputSampler, InputSource, InputSourceKind};
use crate::interaction::state_machine::{Interaction, Transition};
use crate::session::world::World;
use crate::ui::Menu;

/// What an event ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    Ignored,
    Transition(Transition),
    Selection(SelectionEvent),
    /// The gesture landed on a menu button
    ConsumedByUi,
}

pub struct EventRouter<'a> {
    pub interaction: &'a mut Interaction,
    pub world: &'a mut World,
    pub sampler: &'a mut InputSampler,
    pub menu: &'a Menu,
    pub config: &'a SandboxConfig,
}

impl EventRouter<'_> {
    pub fn route(&mut self, event: &InputEvent) -> Routed {
        self.sampler.note_event(event);
        self.world.registry.refresh_world(&*self.sampler);

        let hand = event.handedness;
        let routed = match event.kind {
            InputEventKind::GestureStart => self.gesture_start(hand),
            InputEventKind::GestureEnd => Routed::Transition(self.interaction.gesture_end(
                hand,
                self.world,
                self.sampler,
                self.config,
            )),
            InputEventKind::SecondaryActionStart => Routed::Transition(
                self.interaction
                    .delete_grabbed(hand, self.world, self.sampler),
            ),
            InputEventKind::SqueezeStart => match self.pick(hand) {
                Some(id) => Routed::Selection(self.world.graph.select(id, &self.world.registry)),
                None => Routed::Ignored,
            },
        };
        log::trace!("{hand:?} {:?} -> {routed:?}", event.kind);
        routed
    }

    fn gesture_start(&mut self, hand: Handedness) -> Routed {
        if self.points_at_button(hand) {
            return Routed::ConsumedByUi;
        }

        let hit = self.pick(hand);
        if self.world.graph.in_connection_mode() {
            if let Some(id) = hit {
                return Routed::Selection(self.world.graph.select(id, &self.world.registry));
            }
        }

        Routed::Transition(self.interaction.gesture_start(
            hand,
            hit,
            self.world,
            self.sampler,
            self.config,
        ))
    }

    /// Buttons win over cubes for ray sources
    fn points_at_button(&self, hand: Handedness) -> bool {
        let Some(source) = self.sampler.source(hand) else {
            return false;
        };
        source.kind() == InputSourceKind::Controller
            && source_ray(source).is_some_and(|ray| self.menu.ray_hits_button(&ray))
    }

    fn pick(&self, hand: Handedness) -> Option<ObjectId> {
        let source = self.sampler.source(hand)?;
        let strategy = source.kind().hit_strategy();
        let hit = strategy.pick(source, &self.world.registry.candidates())?;
        log::trace!(
            "{:?} {} hit {} at {:.3}",
            source.handedness(),
            strategy.name(),
            hit.object_id,
            hit.distance
        );
        Some(hit.object_id)
    }
}
