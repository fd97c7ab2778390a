//! Event subscriptions and emitted game events
//!
//! Handlers are plain functions over the session, registered once when the
//! session is built. Emitted events are collected on the session and drained
//! by the frontend after each tick.

use glam::Vec2;

use super::body::{EntityId, Group};
use super::session::Session;

/// Two overlapping entities, in the order of the rule's groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: EntityId,
    pub b: EntityId,
}

/// Pointer handler: receives the pointer position in world pixels
pub type PointerHandler = fn(&mut Session, Vec2);
/// Overlap handler: receives the overlapping pair
pub type OverlapHandler = fn(&mut Session, Contact);

/// Dynamic group `moving` is pushed out of static group `fixed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColliderRule {
    pub moving: Group,
    pub fixed: Group,
}

/// `handler` fires for each overlapping pair of `a` and `b`
#[derive(Debug, Clone, Copy)]
pub struct OverlapRule {
    pub a: Group,
    pub b: Group,
    pub handler: OverlapHandler,
}

/// Registered handlers and physics rules
#[derive(Debug, Clone, Default)]
pub struct Subscriptions {
    pointer_down: Vec<PointerHandler>,
    pointer_up: Vec<PointerHandler>,
    colliders: Vec<ColliderRule>,
    overlaps: Vec<OverlapRule>,
}

impl Subscriptions {
    pub fn on_pointer_down(&mut self, handler: PointerHandler) {
        self.pointer_down.push(handler);
    }

    pub fn on_pointer_up(&mut self, handler: PointerHandler) {
        self.pointer_up.push(handler);
    }

    pub fn add_collider(&mut self, moving: Group, fixed: Group) {
        self.colliders.push(ColliderRule { moving, fixed });
    }

    pub fn add_overlap(&mut self, a: Group, b: Group, handler: OverlapHandler) {
        self.overlaps.push(OverlapRule { a, b, handler });
    }

    pub fn pointer_down(&self) -> &[PointerHandler] {
        &self.pointer_down
    }

    pub fn pointer_up(&self) -> &[PointerHandler] {
        &self.pointer_up
    }

    pub fn colliders(&self) -> &[ColliderRule] {
        &self.colliders
    }

    pub fn overlaps(&self) -> &[OverlapRule] {
        &self.overlaps
    }
}

/// Things the frontend reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// First pointer-down of a session
    Started,
    /// Player touched an obstacle
    ObstacleHit { obstacle: EntityId },
    /// Camera shake began (seconds)
    ShakeStarted { duration: f32 },
    /// Camera fade-out began (seconds)
    FadeStarted { duration: f32 },
    /// Fade-out reached full opacity
    FadeComplete,
    /// Player reached the treasure; show `message` to the user
    TreasureFound { message: String },
    /// World rebuilt, back to idle
    Restarted,
}
