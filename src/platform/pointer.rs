//! Pointer edge buffering
//!
//! DOM pointer handlers call `down`/`up`/`moved`; the game loop drains the
//! buffered edges once per tick with `take_input`.

use glam::Vec2;

use crate::sim::TickInput;

/// Buffers pointer edges and position between ticks
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    pos: Option<Vec2>,
    pressed: bool,
    released: bool,
    held: bool,
}

impl PointerTracker {
    /// Pointer went down at `pos`; repeat downs while held are ignored
    pub fn down(&mut self, pos: Vec2) {
        self.pos = Some(pos);
        if self.held {
            return;
        }
        self.held = true;
        self.pressed = true;
    }

    /// Pointer went up (or was cancelled) at `pos`
    pub fn up(&mut self, pos: Vec2) {
        self.pos = Some(pos);
        if !self.held {
            return;
        }
        self.held = false;
        self.released = true;
    }

    pub fn moved(&mut self, pos: Vec2) {
        self.pos = Some(pos);
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Drain buffered edges into one tick's input
    pub fn take_input(&mut self) -> TickInput {
        TickInput {
            pointer: self.pos.take(),
            pressed: std::mem::take(&mut self.pressed),
            released: std::mem::take(&mut self.released),
        }
    }

    /// Forget buffered edges (tab hidden, focus lost)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
