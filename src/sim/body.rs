//! Arcade bodies
//!
//! Axis-aligned boxes with a velocity. Rotation is cosmetic: collision boxes
//! never rotate.

use glam::Vec2;

use crate::assets::AssetKey;

/// Stable entity identifier, unique across world rebuilds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Hands out ids; never reset, so a rebuilt world shares none with the old one
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Collision group a body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Player,
    Obstacles,
    Goal,
    Platforms,
    Bushes,
}

/// A sprite with an axis-aligned collision box
#[derive(Debug, Clone)]
pub struct Body {
    pub id: EntityId,
    pub sprite: AssetKey,
    /// Box center
    pub pos: Vec2,
    pub vel: Vec2,
    pub half_size: Vec2,
    /// Display rotation (radians)
    pub rotation: f32,
    /// Static bodies never integrate and are never pushed
    pub immovable: bool,
}

impl Body {
    /// Dynamic body for `sprite` at `scale`
    pub fn dynamic(id: EntityId, sprite: AssetKey, pos: Vec2, scale: f32) -> Self {
        Self {
            id,
            sprite,
            pos,
            vel: Vec2::ZERO,
            half_size: sprite.half_size(scale),
            rotation: 0.0,
            immovable: false,
        }
    }

    /// Static body for `sprite` at `scale`
    pub fn fixed(id: EntityId, sprite: AssetKey, pos: Vec2, scale: f32) -> Self {
        Self {
            immovable: true,
            ..Self::dynamic(id, sprite, pos, scale)
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos - self.half_size
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.half_size
    }

    /// Advance position by velocity
    pub fn integrate(&mut self, dt: f32) {
        if !self.immovable {
            self.pos += self.vel * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_never_repeat() {
        let mut ids = IdAllocator::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
        assert_eq!(a, EntityId(1));
    }

    #[test]
    fn test_fixed_body_ignores_velocity() {
        let mut ids = IdAllocator::default();
        let mut bush = Body::fixed(ids.next_id(), AssetKey::Bush, Vec2::new(10.0, 10.0), 1.0);
        bush.vel = Vec2::new(100.0, 100.0);
        bush.integrate(1.0);
        assert_eq!(bush.pos, Vec2::new(10.0, 10.0));

        let mut dog = Body::dynamic(ids.next_id(), AssetKey::Dog, Vec2::ZERO, 0.1);
        dog.vel = Vec2::new(0.0, 60.0);
        dog.integrate(0.5);
        assert_eq!(dog.pos, Vec2::new(0.0, 30.0));
    }
}
