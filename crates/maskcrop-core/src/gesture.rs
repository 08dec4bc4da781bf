//! Pointer gesture classification.
//!
//! The classifier turns raw pointer events into [`GestureAction`]s for the
//! transform and mask engines. It is a small state machine:
//!
//! ```text
//!            Down (paint)          PointerDown
//!   Idle ─────────────────▶ Painting ─────────▶ Zooming
//!    │ ▲   Down (pan)               │              │
//!    │ └──────────── Panning ◀──────┘              │
//!    │        Up / Cancel / PointerUp (any state)  │
//!    └◀────────────────────────────────────────────┘
//! ```
//!
//! Lifting one of two fingers returns to `Idle`, not to the single-finger
//! mode; the remaining finger does nothing until all pointers are up.
//!
//! All positions are in screen space. Mapping stroke points into image space
//! is the editor's job since it owns the transform.

use serde::{Deserialize, Serialize};

use crate::config::{PinchSource, PrimaryMode};
use crate::geometry::Point;

/// Finger spans below this (in screen pixels) are too noisy to derive a scale.
const MIN_PINCH_SPAN: f32 = 10.0;

/// Kind of pointer event, following the usual touch event model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerAction {
    /// First pointer touched down.
    Down,
    /// An additional pointer touched down.
    PointerDown,
    Move,
    /// A non-last pointer lifted.
    PointerUp,
    /// The last pointer lifted.
    Up,
    /// The host aborted the gesture.
    Cancel,
}

/// A pointer event in screen space.
///
/// `pointers` lists every pointer that is down, including the one being
/// lifted on `PointerUp`/`Up`. The first entry is the primary pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub pointers: Vec<Point>,
}

impl PointerEvent {
    pub fn new(action: PointerAction, pointers: Vec<Point>) -> Self {
        Self { action, pointers }
    }

    /// Event for a single pointer at (x, y).
    pub fn single(action: PointerAction, x: f32, y: f32) -> Self {
        Self::new(action, vec![Point::new(x, y)])
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn primary(&self) -> Option<Point> {
        self.pointers.first().copied()
    }

    /// Midpoint of the first two pointers, or the primary pointer alone.
    pub fn focal(&self) -> Option<Point> {
        match self.pointers.as_slice() {
            [a, b, ..] => Some(a.midpoint(*b)),
            [a] => Some(*a),
            [] => None,
        }
    }

    /// Distance between the first two pointers.
    pub fn span(&self) -> Option<f32> {
        match self.pointers.as_slice() {
            [a, b, ..] => Some(a.distance(*b)),
            _ => None,
        }
    }
}

/// Incremental scale reported by a pinch detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleEvent {
    /// Ratio of the current span to the previous one.
    pub factor: f32,
    /// Pivot in screen space.
    pub focal: Point,
}

/// Which engine, if any, is currently driven by pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    #[default]
    Idle,
    Panning,
    Zooming,
    Painting,
}

/// Work for the editor to carry out in response to input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    /// Start a new stroke at a screen point.
    BeginStroke(Point),
    /// Extend the current stroke to a screen point.
    ExtendStroke(Point),
    /// Discard the current stroke.
    EndStroke,
    /// Translate by a screen-space delta.
    Pan { dx: f32, dy: f32 },
    /// Scale about a screen-space focal point.
    Zoom(ScaleEvent),
}

/// Pointer state machine.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    state: GestureState,
    primary_mode: PrimaryMode,
    pinch_source: PinchSource,
    last_focal: Option<Point>,
    last_span: Option<f32>,
}

impl GestureClassifier {
    pub fn new(primary_mode: PrimaryMode, pinch_source: PinchSource) -> Self {
        Self {
            state: GestureState::Idle,
            primary_mode,
            pinch_source,
            last_focal: None,
            last_span: None,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Change what a single finger does. Takes effect on the next touch-down.
    pub fn set_primary_mode(&mut self, mode: PrimaryMode) {
        self.primary_mode = mode;
    }

    /// Classify one pointer event.
    pub fn handle(&mut self, event: &PointerEvent) -> Vec<GestureAction> {
        let mut actions = Vec::new();
        match event.action {
            PointerAction::Down => {
                self.end_stroke_into(&mut actions);
                let Some(p) = event.primary() else {
                    self.go_idle();
                    return actions;
                };
                self.last_focal = Some(p);
                self.last_span = None;
                match self.primary_mode {
                    PrimaryMode::Paint => {
                        self.transition(GestureState::Painting);
                        actions.push(GestureAction::BeginStroke(p));
                    }
                    PrimaryMode::Pan => self.transition(GestureState::Panning),
                }
            }
            PointerAction::PointerDown => {
                self.end_stroke_into(&mut actions);
                self.transition(GestureState::Zooming);
                self.last_focal = event.focal();
                self.last_span = event.span();
            }
            PointerAction::Move => self.handle_move(event, &mut actions),
            PointerAction::PointerUp => {
                self.end_stroke_into(&mut actions);
                self.go_idle();
            }
            PointerAction::Up | PointerAction::Cancel => {
                // The stroke path is dropped whatever state we were in
                actions.push(GestureAction::EndStroke);
                self.go_idle();
            }
        }
        actions
    }

    /// Classify an incremental scale from a host pinch detector.
    ///
    /// Ignored unless the pinch source is [`PinchSource::Detector`].
    pub fn handle_scale(&mut self, event: ScaleEvent) -> Vec<GestureAction> {
        if self.pinch_source != PinchSource::Detector {
            return Vec::new();
        }
        let mut actions = Vec::new();
        self.end_stroke_into(&mut actions);
        self.transition(GestureState::Zooming);
        actions.push(GestureAction::Zoom(event));
        actions
    }

    /// Return to `Idle`, as on teardown or a new image.
    pub fn reset(&mut self) {
        self.go_idle();
    }

    fn handle_move(&mut self, event: &PointerEvent, actions: &mut Vec<GestureAction>) {
        match self.state {
            GestureState::Idle => {}
            GestureState::Painting => {
                if let Some(p) = event.primary() {
                    actions.push(GestureAction::ExtendStroke(p));
                }
            }
            GestureState::Panning => {
                if let Some(p) = event.primary() {
                    self.pan_to(p, actions);
                }
            }
            GestureState::Zooming => {
                let Some(focal) = event.focal() else {
                    return;
                };
                self.pan_to(focal, actions);

                if self.pinch_source == PinchSource::Pointers {
                    let span = event.span();
                    if let (Some(prev), Some(span)) = (self.last_span, span) {
                        if prev >= MIN_PINCH_SPAN && span >= MIN_PINCH_SPAN {
                            actions.push(GestureAction::Zoom(ScaleEvent {
                                factor: span / prev,
                                focal,
                            }));
                        }
                    }
                    self.last_span = span;
                }
            }
        }
    }

    fn pan_to(&mut self, p: Point, actions: &mut Vec<GestureAction>) {
        if let Some(prev) = self.last_focal {
            let (dx, dy) = (p.x - prev.x, p.y - prev.y);
            if dx != 0.0 || dy != 0.0 {
                actions.push(GestureAction::Pan { dx, dy });
            }
        }
        self.last_focal = Some(p);
    }

    fn end_stroke_into(&self, actions: &mut Vec<GestureAction>) {
        if self.state == GestureState::Painting {
            actions.push(GestureAction::EndStroke);
        }
    }

    fn go_idle(&mut self) {
        self.transition(GestureState::Idle);
        self.last_focal = None;
        self.last_span = None;
    }

    fn transition(&mut self, next: GestureState) {
        if self.state != next {
            log::debug!("gesture {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}
