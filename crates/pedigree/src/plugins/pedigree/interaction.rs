//! Pointer and touch interaction
//!
//! [`InteractionController`] is a pure state machine: handlers hit-test
//! against the last render and return [`InteractionEffect`]s for the engine
//! to apply. It never touches the dataset or the surface itself.
//!
//! ```text
//!            down on node                 up / leave
//!   Idle ───────────────────▶ Dragging ──────────────▶ Idle
//!    ▲  │ move over node          │ move: MoveNode
//!    │  ▼                         ▼
//!   Hovering ◀──────────────  (redraw per move)
//! ```

use serde::Serialize;
use tracing::{debug, trace};

use super::{hit_test, CoordinateIndex, GridTransform, PedigreeDatabase};
use crate::core::{CursorStyle, GridPos, PedigreeConfig, Point};

/// Controller state
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InteractionState {
    #[default]
    Idle,
    Hovering { id: String },
    /// `offset` is the pointer position relative to the node centre at
    /// pointer-down
    Dragging { id: String, offset: Point },
}

impl InteractionState {
    pub fn cursor(&self) -> CursorStyle {
        match self {
            InteractionState::Idle => CursorStyle::Default,
            InteractionState::Hovering { .. } => CursorStyle::Grab,
            InteractionState::Dragging { .. } => CursorStyle::Grabbing,
        }
    }

    /// Id of the node being dragged
    pub fn dragging(&self) -> Option<&str> {
        match self {
            InteractionState::Dragging { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Work requested from the engine by an input event
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEffect {
    /// Set the person's grid position, then optimize and redraw
    MoveNode { id: String, pos: GridPos },
    /// A drag ended; notify the node-moved hook
    DragFinished { id: String },
    /// The cursor affordance changed
    SetCursor(CursorStyle),
}

/// One touch contact, in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<TouchPoint> for Point {
    fn from(touch: TouchPoint) -> Self {
        Point::new(touch.x, touch.y)
    }
}

/// Pointer-driven drag state machine
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    config: PedigreeConfig,
    transform: GridTransform,
}

impl InteractionController {
    pub fn new(config: PedigreeConfig) -> Self {
        Self {
            state: InteractionState::Idle,
            transform: GridTransform::from_config(&config),
            config,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn cursor(&self) -> CursorStyle {
        self.state.cursor()
    }

    pub fn is_enabled(&self) -> bool {
        self.config.interactive
    }

    /// Drop any hover or drag without emitting effects
    pub fn cancel(&mut self) {
        self.state = InteractionState::Idle;
    }

    pub fn pointer_down(
        &mut self,
        point: Point,
        database: &PedigreeDatabase,
        index: &CoordinateIndex,
    ) -> Vec<InteractionEffect> {
        if !self.is_enabled() {
            return Vec::new();
        }

        let before = self.cursor();
        let mut effects = Vec::new();
        // A second press (another finger) ends the drag in progress
        if let InteractionState::Dragging { id, .. } = &self.state {
            debug!(id = %id, "Drag interrupted by a new press");
            effects.push(InteractionEffect::DragFinished { id: id.clone() });
        }

        self.state = match hit_test(point, database, index, &self.config) {
            Some(id) => {
                // Present in the index whenever the hit succeeds
                let center = index.get(id).unwrap_or(point);
                debug!(id, "Drag started");
                InteractionState::Dragging {
                    id: id.to_string(),
                    offset: point - center,
                }
            }
            None => InteractionState::Idle,
        };
        effects.extend(self.cursor_effect(before));
        effects
    }

    pub fn pointer_move(
        &mut self,
        point: Point,
        database: &PedigreeDatabase,
        index: &CoordinateIndex,
    ) -> Vec<InteractionEffect> {
        if !self.is_enabled() {
            return Vec::new();
        }

        if let InteractionState::Dragging { id, offset } = &self.state {
            let pos = self.transform.pixel_to_grid(point - *offset);
            trace!(id = %id, x = pos.x, y = pos.y, "Dragging node");
            return vec![InteractionEffect::MoveNode {
                id: id.clone(),
                pos,
            }];
        }

        let before = self.cursor();
        self.state = match hit_test(point, database, index, &self.config) {
            Some(id) => InteractionState::Hovering { id: id.to_string() },
            None => InteractionState::Idle,
        };
        self.cursor_effect(before).into_iter().collect()
    }

    pub fn pointer_up(&mut self) -> Vec<InteractionEffect> {
        self.release()
    }

    pub fn pointer_leave(&mut self) -> Vec<InteractionEffect> {
        self.release()
    }

    /// Maps onto [`pointer_down`](Self::pointer_down) using the first touch
    pub fn touch_start(
        &mut self,
        touches: &[TouchPoint],
        database: &PedigreeDatabase,
        index: &CoordinateIndex,
    ) -> Vec<InteractionEffect> {
        match touches.first() {
            Some(&touch) => self.pointer_down(touch.into(), database, index),
            None => Vec::new(),
        }
    }

    /// Maps onto [`pointer_move`](Self::pointer_move) using the first touch
    pub fn touch_move(
        &mut self,
        touches: &[TouchPoint],
        database: &PedigreeDatabase,
        index: &CoordinateIndex,
    ) -> Vec<InteractionEffect> {
        match touches.first() {
            Some(&touch) => self.pointer_move(touch.into(), database, index),
            None => Vec::new(),
        }
    }

    /// Maps onto [`pointer_up`](Self::pointer_up); the remaining touch list
    /// is empty when the last finger lifts, so it is not consulted
    pub fn touch_end(&mut self) -> Vec<InteractionEffect> {
        self.pointer_up()
    }

    fn release(&mut self) -> Vec<InteractionEffect> {
        if !self.is_enabled() {
            return Vec::new();
        }

        let before = self.cursor();
        let previous = std::mem::take(&mut self.state);
        let mut effects = Vec::new();
        if let InteractionState::Dragging { id, .. } = previous {
            debug!(id = %id, "Drag finished");
            effects.push(InteractionEffect::DragFinished { id });
        }
        effects.extend(self.cursor_effect(before));
        effects
    }

    fn cursor_effect(&self, before: CursorStyle) -> Option<InteractionEffect> {
        let after = self.cursor();
        (after != before).then_some(InteractionEffect::SetCursor(after))
    }
}
