#![forbid(unsafe_code)]

//! Canonical pointer input types.
//!
//! Hosts translate their native mouse and touch input into [`InputEvent`]
//! values. The drag engine only ever needs a single coordinate pair per
//! event, which [`extract_coordinates`] resolves.
//!
//! # Design Notes
//!
//! - Coordinates are page pixels (the same space as container rectangles).
//! - Touch events carry both the active touch list and the changed touch
//!   list; on touch-end the active list no longer holds the lifted finger,
//!   so the changed list is consulted instead.
//! - Only single-pointer interaction is modelled. Additional touch points are
//!   ignored.

use crate::geometry::Point;

/// Canonical pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A mouse (or pen, or generic pointer) event.
    Mouse(MouseEvent),
    /// A touch event.
    Touch(TouchEvent),
}

/// Normalized phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// A mouse event with direct coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    pub phase: PointerPhase,
    pub x: f64,
    pub y: f64,
    /// Element path under the pointer, innermost first.
    pub target: EventTarget,
}

impl MouseEvent {
    /// Create a new mouse event with an empty target path.
    #[must_use]
    pub fn new(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            phase,
            x,
            y,
            target: EventTarget::default(),
        }
    }

    /// Attach a target path.
    #[must_use]
    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = target;
        self
    }
}

/// Touch lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// A single touch contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(id: u64, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

/// A touch event.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    /// Touches currently in contact with the surface.
    pub touches: Vec<TouchPoint>,
    /// Touches that changed in this event.
    pub changed_touches: Vec<TouchPoint>,
    pub target: EventTarget,
}

impl TouchEvent {
    /// Single-finger touch event helper; the point is placed in the list the
    /// phase reads from.
    #[must_use]
    pub fn single(phase: TouchPhase, x: f64, y: f64) -> Self {
        let point = TouchPoint::new(0, x, y);
        let (touches, changed_touches) = match phase {
            TouchPhase::Start | TouchPhase::Move => (vec![point], vec![point]),
            TouchPhase::End | TouchPhase::Cancel => (Vec::new(), vec![point]),
        };
        Self {
            phase,
            touches,
            changed_touches,
            target: EventTarget::default(),
        }
    }
}

impl InputEvent {
    /// Convenience constructor for a mouse event.
    #[must_use]
    pub fn mouse(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self::Mouse(MouseEvent::new(phase, x, y))
    }

    /// Normalized pointer phase.
    #[must_use]
    pub fn phase(&self) -> PointerPhase {
        match self {
            Self::Mouse(m) => m.phase,
            Self::Touch(t) => match t.phase {
                TouchPhase::Start => PointerPhase::Down,
                TouchPhase::Move => PointerPhase::Move,
                TouchPhase::End | TouchPhase::Cancel => PointerPhase::Up,
            },
        }
    }

    /// Element path the event was dispatched to.
    #[must_use]
    pub fn target(&self) -> &EventTarget {
        match self {
            Self::Mouse(m) => &m.target,
            Self::Touch(t) => &t.target,
        }
    }

    /// Attach a target path.
    #[must_use]
    pub fn with_target(mut self, target: EventTarget) -> Self {
        match &mut self {
            Self::Mouse(m) => m.target = target,
            Self::Touch(t) => t.target = target,
        }
        self
    }
}

/// Resolve the pointer coordinates of an event.
///
/// Touch start/move read the first active touch, touch end/cancel read the
/// first changed touch, mouse events use their direct coordinates. Returns
/// `None` when no coordinate is available (e.g. a touch event with empty
/// lists); callers treat that as "no position this event".
#[must_use]
pub fn extract_coordinates(event: &InputEvent) -> Option<Point> {
    match event {
        InputEvent::Mouse(m) => Some(Point::new(m.x, m.y)),
        InputEvent::Touch(t) => {
            let point = match t.phase {
                TouchPhase::Start | TouchPhase::Move => t.touches.first(),
                TouchPhase::End | TouchPhase::Cancel => t.changed_touches.first(),
            }?;
            Some(Point::new(point.x, point.y))
        }
    }
}

// ---------------------------------------------------------------------------
// Event targets
// ---------------------------------------------------------------------------

/// Description of one element on the target path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementDescriptor {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl ElementDescriptor {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Whether this element carries `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Path from the event target up to (and including) the sortable item.
///
/// `path[0]` is the innermost element. An empty path means the host did not
/// report a target, which only matters when a drag handle selector is set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventTarget {
    pub path: Vec<ElementDescriptor>,
}

impl EventTarget {
    #[must_use]
    pub fn new(path: Vec<ElementDescriptor>) -> Self {
        Self { path }
    }

    /// Innermost element, if any.
    #[must_use]
    pub fn element(&self) -> Option<&ElementDescriptor> {
        self.path.first()
    }
}
