//! Pointer-activated buttons.
//!
//! A button's state is recomputed from scratch every frame: pointers mark it
//! `Hovered` or `Pressed` during evaluation, [`Button::settle`] then fires the
//! action on a fresh press, moves the state into `prev_state` and clears the
//! current state for the next frame.

use crate::gfx::picking::{Ray, AABB};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord)]
pub enum ButtonState {
    #[default]
    None,
    Hovered,
    Pressed,
}

/// What a button does when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    ToggleConnectionMode,
    Reset,
    Exit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: String,
    pub bounds: AABB,
    pub action: ButtonAction,
    pub curr_state: ButtonState,
    pub prev_state: ButtonState,
}

impl Button {
    pub fn new(label: impl Into<String>, bounds: AABB, action: ButtonAction) -> Self {
        Self {
            label: label.into(),
            bounds,
            action,
            curr_state: ButtonState::None,
            prev_state: ButtonState::None,
        }
    }

    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        self.bounds.intersect_ray(ray)
    }

    /// Record a pointer on this button. Several pointers in one frame keep
    /// the strongest state.
    pub fn mark(&mut self, state: ButtonState) {
        self.curr_state = self.curr_state.max(state);
    }

    /// End-of-frame bookkeeping. Returns the action if this frame is the
    /// first pressed frame.
    pub fn settle(&mut self) -> Option<ButtonAction> {
        let fired = (self.curr_state == ButtonState::Pressed
            && self.prev_state != ButtonState::Pressed)
            .then_some(self.action);
        self.prev_state = self.curr_state;
        self.curr_state = ButtonState::None;
        fired
    }

    /// Visual scale for the state settled last frame
    pub fn display_scale(&self, hover_scale: f32) -> f32 {
        if self.prev_state == ButtonState::None {
            1.0
        } else {
            hover_scale
        }
    }
}
