//! # In-World User Interface
//!
//! The menu floating in front of the user: a row of buttons, an instruction
//! board and a calibration target. Elements form a small closed set
//! ([`UiElement`]) held in a plain ordered list; each frame [`Menu::update`]
//! walks the list once per pointer.
//!
//! ## Per-frame evaluation
//!
//! For every tracked pointer the nearest intersected element along its ray is
//! found. The pointer's cursor distance is set to that hit, or to a neutral
//! distance when nothing is hit. A hit button becomes `Pressed` if the
//! pointer's gesture is engaged and `Hovered` otherwise. Buttons then settle:
//! an action fires on the first pressed frame only, and every button's state is
//! cleared so nothing carries over without being re-detected.
//!
//! ## Key Components
//!
//! - [`Menu`] - Ordered element list plus one [`PointerCursor`] per hand
//! - [`button::Button`] - Edge-triggered pressable element
//! - [`panel::InstructionText`] / [`panel::CalibrationTarget`] - Passive elements

pub mod button;
pub mod panel;

use cgmath::Vector3;

use crate::gfx::picking::{source_ray, Ray, AABB};
use crate::input::{Handedness, InputSampler, InputSource};

// Re-export main types
pub use button::{Button, ButtonAction, ButtonState};
pub use panel::{CalibrationTarget, InstructionText};

#[derive(Debug, Clone, PartialEq)]
pub enum UiElement {
    Button(Button),
    InstructionText(InstructionText),
    CalibrationTarget(CalibrationTarget),
}

impl UiElement {
    /// Ray distance to this element, for elements pointers can hit
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        match self {
            UiElement::Button(button) => button.intersect(ray),
            UiElement::InstructionText(text) => text.intersect(ray),
            UiElement::CalibrationTarget(_) => None,
        }
    }
}

/// Where a hand's pointer ray currently ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerCursor {
    pub ray: Option<Ray>,
    pub distance: f32,
    /// Index of the element hit, if any
    pub target: Option<usize>,
}

impl PointerCursor {
    fn idle(neutral_distance: f32) -> Self {
        Self {
            ray: None,
            distance: neutral_distance,
            target: None,
        }
    }

    /// World position of the cursor tip
    pub fn tip(&self) -> Option<Vector3<f32>> {
        self.ray.map(|ray| ray.point_at(self.distance))
    }
}

/// Something the menu wants the session to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    Action(ButtonAction),
    Calibrated(Vector3<f32>),
}

#[derive(Debug, Clone)]
pub struct Menu {
    elements: Vec<UiElement>,
    cursors: [PointerCursor; 2],
    neutral_distance: f32,
}

impl Menu {
    pub fn new(elements: Vec<UiElement>, neutral_distance: f32) -> Self {
        Self {
            elements,
            cursors: [PointerCursor::idle(neutral_distance); 2],
            neutral_distance,
        }
    }

    /// The standard layout: three buttons at chest height one metre ahead,
    /// the instruction board above them and the calibration target below
    pub fn standard(neutral_distance: f32) -> Self {
        let button_half = Vector3::new(0.09, 0.035, 0.01);
        let button = |x: f32, label: &str, action| {
            UiElement::Button(Button::new(
                label,
                AABB::from_center(Vector3::new(x, 1.1, -1.0), button_half),
                action,
            ))
        };

        Self::new(
            vec![
                UiElement::InstructionText(InstructionText::new(
                    "Pinch empty space to spawn a cube. Pinch a cube to grab it.",
                    AABB::from_center(Vector3::new(0.0, 1.4, -1.05), Vector3::new(0.4, 0.12, 0.005)),
                )),
                button(-0.22, "Connect", ButtonAction::ToggleConnectionMode),
                button(0.0, "Reset", ButtonAction::Reset),
                button(0.22, "Exit", ButtonAction::Exit),
                UiElement::CalibrationTarget(CalibrationTarget::new(
                    Vector3::new(0.0, 0.9, -0.45),
                    0.04,
                )),
            ],
            neutral_distance,
        )
    }

    pub fn elements(&self) -> &[UiElement] {
        &self.elements
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.elements.iter().filter_map(|element| match element {
            UiElement::Button(button) => Some(button),
            _ => None,
        })
    }

    pub fn cursor(&self, hand: Handedness) -> &PointerCursor {
        &self.cursors[hand.index()]
    }

    /// Nearest element hit by `ray`, with its distance
    pub fn nearest_hit(&self, ray: &Ray) -> Option<(usize, f32)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(i, element)| element.intersect(ray).map(|d| (i, d)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Whether `ray` hits any button. Used to give buttons priority over
    /// cubes for ray pointers.
    pub fn ray_hits_button(&self, ray: &Ray) -> bool {
        self.buttons().any(|button| button.intersect(ray).is_some())
    }

    /// Replace the instruction board text
    pub fn set_message(&mut self, message: &str) {
        for element in &mut self.elements {
            if let UiElement::InstructionText(text) = element {
                text.text = message.to_string();
            }
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.elements.iter().find_map(|element| match element {
            UiElement::InstructionText(text) => Some(text.text.as_str()),
            _ => None,
        })
    }

    /// Evaluate every pointer against the menu for this frame
    pub fn update(&mut self, sampler: &InputSampler) -> Vec<UiEvent> {
        let mut events = Vec::new();

        for hand in Handedness::ALL {
            let source = sampler.source(hand);
            let ray = source.and_then(|s| source_ray(s));
            let mut cursor = PointerCursor {
                ray,
                ..PointerCursor::idle(self.neutral_distance)
            };

            if let Some((index, distance)) = ray.as_ref().and_then(|r| self.nearest_hit(r)) {
                cursor.distance = distance;
                cursor.target = Some(index);
                if let UiElement::Button(button) = &mut self.elements[index] {
                    let engaged = sampler.gesture_engaged(hand);
                    button.mark(if engaged {
                        ButtonState::Pressed
                    } else {
                        ButtonState::Hovered
                    });
                }
            }
            self.cursors[hand.index()] = cursor;

            if let Some(point) = source.and_then(|s| s.reference_point()) {
                for element in &mut self.elements {
                    if let UiElement::CalibrationTarget(target) = element {
                        if let Some(anchor) = target.touch(point) {
                            log::info!("calibrated at {anchor:?}");
                            events.push(UiEvent::Calibrated(anchor));
                        }
                    }
                }
            }
        }

        for element in &mut self.elements {
            if let UiElement::Button(button) = element {
                if let Some(action) = button.settle() {
                    log::debug!("button '{}' pressed", button.label);
                    events.push(UiEvent::Action(action));
                }
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::Transform;
    use crate::input::{FrameInput, InputSourceKind, TrackedSource};
    use cgmath::{InnerSpace, Quaternion};

    /// Right controller at head height aiming at `target`
    fn aiming_at(target: Vector3<f32>, engaged: bool) -> FrameInput {
        let origin = Vector3::new(0.0, 1.2, 0.0);
        let rotation = Quaternion::from_arc(-Vector3::unit_z(), (target - origin).normalize(), None);
        FrameInput::new().with_source(
            TrackedSource::new(Handedness::Right, InputSourceKind::Controller)
                .with_pose(Transform::new(origin, rotation, 1.0))
                .engaged(engaged),
        )
    }

    fn reset_button_center() -> Vector3<f32> {
        Vector3::new(0.0, 1.1, -1.0)
    }

    #[test]
    fn test_press_and_hold_fires_once() {
        let mut menu = Menu::standard(1.5);
        let mut sampler = InputSampler::new();
        let mut fired = Vec::new();
        for _ in 0..5 {
            sampler.sample(&aiming_at(reset_button_center(), true));
            fired.extend(menu.update(&sampler));
        }
        assert_eq!(fired, vec![UiEvent::Action(ButtonAction::Reset)]);
    }

    #[test]
    fn test_hover_only_never_fires() {
        let mut menu = Menu::standard(1.5);
        let mut sampler = InputSampler::new();
        for _ in 0..5 {
            sampler.sample(&aiming_at(reset_button_center(), false));
            assert!(menu.update(&sampler).is_empty());
        }
        let reset = menu.buttons().find(|b| b.action == ButtonAction::Reset).unwrap();
        assert_eq!(reset.prev_state, ButtonState::Hovered);
        assert_eq!(reset.display_scale(1.1), 1.1);
    }

    #[test]
    fn test_cursor_falls_back_to_neutral_distance() {
        let mut menu = Menu::standard(1.5);
        let mut sampler = InputSampler::new();
        sampler.sample(&aiming_at(Vector3::new(0.0, 5.0, 0.0), false));
        menu.update(&sampler);

        let cursor = menu.cursor(Handedness::Right);
        assert_eq!(cursor.distance, 1.5);
        assert_eq!(cursor.target, None);
    }

    #[test]
    fn test_cursor_stops_on_button() {
        let mut menu = Menu::standard(1.5);
        let mut sampler = InputSampler::new();
        sampler.sample(&aiming_at(reset_button_center(), false));
        menu.update(&sampler);

        let cursor = menu.cursor(Handedness::Right);
        assert!(cursor.distance < 1.1);
        assert!(matches!(
            menu.elements()[cursor.target.unwrap()],
            UiElement::Button(_)
        ));
    }

    #[test]
    fn test_hover_is_not_carried_without_pointer() {
        let mut menu = Menu::standard(1.5);
        let mut sampler = InputSampler::new();
        sampler.sample(&aiming_at(reset_button_center(), false));
        menu.update(&sampler);
        sampler.sample(&FrameInput::new());
        menu.update(&sampler);
        assert!(menu.buttons().all(|b| b.prev_state == ButtonState::None));
    }

    #[test]
    fn test_message_replaced() {
        let mut menu = Menu::standard(1.5);
        menu.set_message("Exiting");
        assert_eq!(menu.message(), Some("Exiting"));
    }
}
