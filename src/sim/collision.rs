//! Overlap tests and static collider response
//!
//! Boxes touching edge-to-edge do not count as overlapping. A dynamic body
//! that sinks into a static one is pushed out along the axis of least
//! penetration and loses its velocity on that axis.

use glam::Vec2;

use super::body::Body;

/// Result of a separation
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the bodies overlapped
    pub hit: bool,
    /// Unit normal pointing from the static body toward the dynamic one
    pub normal: Vec2,
    /// Penetration depth that was corrected
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Per-axis penetration of two boxes (positive on both axes means overlap)
fn penetration(a: &Body, b: &Body) -> Vec2 {
    let delta = (b.pos - a.pos).abs();
    a.half_size + b.half_size - delta
}

/// True when the boxes share interior area
pub fn overlaps(a: &Body, b: &Body) -> bool {
    let p = penetration(a, b);
    p.x > 0.0 && p.y > 0.0
}

/// Push `body` out of `fixed` and cancel the velocity into it
pub fn separate(body: &mut Body, fixed: &Body) -> CollisionResult {
    if body.immovable {
        return CollisionResult::miss();
    }

    let p = penetration(body, fixed);
    if p.x <= 0.0 || p.y <= 0.0 {
        return CollisionResult::miss();
    }

    let offset = body.pos - fixed.pos;
    let normal = if p.x < p.y {
        Vec2::new(if offset.x < 0.0 { -1.0 } else { 1.0 }, 0.0)
    } else {
        Vec2::new(0.0, if offset.y < 0.0 { -1.0 } else { 1.0 })
    };
    let depth = p.x.min(p.y);

    body.pos += normal * depth;
    // Only cancel motion heading into the static body
    let into = body.vel.dot(normal);
    if into < 0.0 {
        body.vel -= normal * into;
    }

    CollisionResult {
        hit: true,
        normal,
        penetration: depth,
    }
}
