//! # Input Model
//!
//! Types delivered by the host XR runtime: discrete per-source events
//! (gesture start/end, squeeze, secondary action) and the continuous
//! per-frame state of every tracked hand or controller.
//!
//! ## Key Components
//!
//! - [`InputEvent`] - One discrete event from one input source
//! - [`TrackedSource`] - The sampled state of a hand or controller this frame
//! - [`InputSource`] - Capability trait the interaction core reads sources through
//! - [`InputSampler`] - Keeps the current and previous sample per hand so the
//!   core can detect edges (axis threshold crossings, button presses)

use cgmath::Vector3;

use crate::gfx::scene::transform::Transform;

/// Which hand an input source belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub const ALL: [Handedness; 2] = [Handedness::Left, Handedness::Right];

    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Stable slot index for per-hand arrays
    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// What kind of device backs an input source. The kind selects the
/// hit-test strategy (ray for controllers, proximity for tracked hands).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputSourceKind {
    #[default]
    Controller,
    Hand,
}

/// Discrete event types delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEventKind {
    /// Pinch began / trigger pressed
    GestureStart,
    /// Pinch ended / trigger released
    GestureEnd,
    /// Secondary button pressed (delete)
    SecondaryActionStart,
    /// Grip pressed (connection select)
    SqueezeStart,
}

/// A single discrete input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub handedness: Handedness,
    pub kind: InputEventKind,
    pub source: InputSourceKind,
    /// World pose of the source at the time of the event, if tracked
    pub pose: Option<Transform>,
    /// Fingertip or controller tip at the time of the event, when the host
    /// reports one separately from the pose
    pub reference_point: Option<Vector3<f32>>,
}

impl InputEvent {
    pub fn new(handedness: Handedness, kind: InputEventKind, source: InputSourceKind) -> Self {
        Self {
            handedness,
            kind,
            source,
            pose: None,
            reference_point: None,
        }
    }

    pub fn with_pose(mut self, pose: Transform) -> Self {
        self.pose = Some(pose);
        self
    }

    pub fn with_reference_point(mut self, point: Vector3<f32>) -> Self {
        self.reference_point = Some(point);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GamepadButton {
    pub pressed: bool,
}

/// Continuous controller state in the xr-standard layout
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GamepadState {
    pub axes: Vec<f32>,
    pub buttons: Vec<GamepadButton>,
}

impl GamepadState {
    /// Axis value, or 0.0 when the device does not report that axis
    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    /// Button state, or released when the device does not report that button
    pub fn pressed(&self, index: usize) -> bool {
        self.buttons.get(index).is_some_and(|b| b.pressed)
    }

    pub fn with_axis(mut self, index: usize, value: f32) -> Self {
        if self.axes.len() <= index {
            self.axes.resize(index + 1, 0.0);
        }
        self.axes[index] = value;
        self
    }

    pub fn with_button(mut self, index: usize, pressed: bool) -> Self {
        if self.buttons.len() <= index {
            self.buttons.resize(index + 1, GamepadButton::default());
        }
        self.buttons[index].pressed = pressed;
        self
    }
}

/// Capability the interaction core needs from any tracked input source
pub trait InputSource {
    fn handedness(&self) -> Handedness;
    fn kind(&self) -> InputSourceKind;
    /// World pose of the grip / wrist, if tracked this frame
    fn pose(&self) -> Option<Transform>;
    /// Point used for proximity tests and two-handed scaling
    /// (index fingertip or controller tip)
    fn reference_point(&self) -> Option<Vector3<f32>>;
    /// Whether the primary gesture (pinch / trigger) is currently held
    fn gesture_engaged(&self) -> bool;
}

/// State of one tracked source for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedSource {
    pub handedness: Handedness,
    pub kind: InputSourceKind,
    pub pose: Option<Transform>,
    pub reference_point: Option<Vector3<f32>>,
    pub gamepad: Option<GamepadState>,
    pub gesture_engaged: bool,
}

impl TrackedSource {
    pub fn new(handedness: Handedness, kind: InputSourceKind) -> Self {
        Self {
            handedness,
            kind,
            pose: None,
            reference_point: None,
            gamepad: None,
            gesture_engaged: false,
        }
    }

    /// Set the pose; the reference point defaults to the pose position
    pub fn with_pose(mut self, pose: Transform) -> Self {
        if self.reference_point.is_none() {
            self.reference_point = Some(pose.position);
        }
        self.pose = Some(pose);
        self
    }

    pub fn with_reference_point(mut self, point: Vector3<f32>) -> Self {
        self.reference_point = Some(point);
        self
    }

    pub fn with_gamepad(mut self, gamepad: GamepadState) -> Self {
        self.gamepad = Some(gamepad);
        self
    }

    pub fn engaged(mut self, engaged: bool) -> Self {
        self.gesture_engaged = engaged;
        self
    }
}

impl InputSource for TrackedSource {
    fn handedness(&self) -> Handedness {
        self.handedness
    }

    fn kind(&self) -> InputSourceKind {
        self.kind
    }

    fn pose(&self) -> Option<Transform> {
        self.pose
    }

    fn reference_point(&self) -> Option<Vector3<f32>> {
        self.reference_point
    }

    fn gesture_engaged(&self) -> bool {
        self.gesture_engaged
    }
}

/// Everything the host sampled for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub sources: Vec<TrackedSource>,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: TrackedSource) -> Self {
        self.sources.push(source);
        self
    }
}

/// Read access to the current world pose of each hand
pub trait PoseSource {
    fn hand_pose(&self, hand: Handedness) -> Option<Transform>;
}

/// Latest and previous samples per hand.
///
/// Sampling happens once at the start of each frame. Events arriving between
/// frames refresh the pose of their source so transitions use the pose the
/// event was generated at.
///
/// Gestures arrive only as events, so the engaged flag they set is kept per
/// hand and survives resampling until the matching `GestureEnd`.
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    current: [Option<TrackedSource>; 2],
    previous_gamepad: [Option<GamepadState>; 2],
    event_engaged: [bool; 2],
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step (1) of the frame: store this frame's samples, keeping the last
    /// gamepad sample of each hand for edge detection.
    pub fn sample(&mut self, frame: &FrameInput) {
        for hand in Handedness::ALL {
            let slot = hand.index();
            self.previous_gamepad[slot] = self.current[slot]
                .as_ref()
                .and_then(|source| source.gamepad.clone());

            // Sources not reported this frame are untracked
            self.current[slot] = frame
                .sources
                .iter()
                .find(|source| source.handedness == hand)
                .cloned();
            if let Some(source) = self.current[slot].as_mut() {
                source.gesture_engaged |= self.event_engaged[slot];
            }
        }
    }

    /// Record the pose and gesture state carried by a discrete event.
    ///
    /// A reference point sent with the event wins. Otherwise the sampled
    /// reference point follows the new pose rigidly, and a source seen for the
    /// first time falls back to the pose position.
    pub fn note_event(&mut self, event: &InputEvent) {
        let slot = event.handedness.index();
        match event.kind {
            InputEventKind::GestureStart => self.event_engaged[slot] = true,
            InputEventKind::GestureEnd => self.event_engaged[slot] = false,
            _ => {}
        }

        let source = self.current[slot]
            .get_or_insert_with(|| TrackedSource::new(event.handedness, event.source));
        source.kind = event.source;
        match event.kind {
            InputEventKind::GestureStart => source.gesture_engaged = true,
            InputEventKind::GestureEnd => source.gesture_engaged = false,
            _ => {}
        }

        if let Some(pose) = event.pose {
            let carried = source.pose.zip(source.reference_point).map(|(old_pose, point)| {
                pose.transform_point(old_pose.inverse().transform_point(point))
            });
            source.reference_point = event
                .reference_point
                .or(carried)
                .or(Some(pose.position));
            source.pose = Some(pose);
        } else if let Some(point) = event.reference_point {
            source.reference_point = Some(point);
        }
    }

    /// Whether the primary gesture of `hand` is held, by event or by sample
    pub fn gesture_engaged(&self, hand: Handedness) -> bool {
        self.event_engaged[hand.index()]
            || self.source(hand).is_some_and(|s| s.gesture_engaged)
    }

    pub fn source(&self, hand: Handedness) -> Option<&TrackedSource> {
        self.current[hand.index()].as_ref()
    }

    pub fn kind(&self, hand: Handedness) -> InputSourceKind {
        self.source(hand).map(|s| s.kind).unwrap_or_default()
    }

    pub fn reference_point(&self, hand: Handedness) -> Option<Vector3<f32>> {
        self.source(hand).and_then(|s| s.reference_point)
    }

    pub fn gamepad(&self, hand: Handedness) -> Option<&GamepadState> {
        self.source(hand).and_then(|s| s.gamepad.as_ref())
    }

    /// (previous, current) value of an axis, 0.0 for missing samples
    pub fn axis_pair(&self, hand: Handedness, axis: usize) -> (f32, f32) {
        let previous = self.previous_gamepad[hand.index()]
            .as_ref()
            .map_or(0.0, |g| g.axis(axis));
        let current = self.gamepad(hand).map_or(0.0, |g| g.axis(axis));
        (previous, current)
    }

    /// Whether a button went from released to pressed since the last frame
    pub fn button_pressed_edge(&self, hand: Handedness, button: usize) -> bool {
        let was = self.previous_gamepad[hand.index()]
            .as_ref()
            .is_some_and(|g| g.pressed(button));
        let is = self.gamepad(hand).is_some_and(|g| g.pressed(button));
        is && !was
    }

    /// Forget all samples (session reset)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl PoseSource for InputSampler {
    fn hand_pose(&self, hand: Handedness) -> Option<Transform> {
        self.source(hand).and_then(|s| s.pose)
    }
}
