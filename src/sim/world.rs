//! World construction and physics step
//!
//! A world is built in one go from the viewport and tuning and thrown away
//! whole on restart.

use std::slice;

use glam::Vec2;

use super::body::{Body, EntityId, Group, IdAllocator};
use super::collision::{overlaps, separate};
use super::events::Contact;
use crate::assets::AssetKey;
use crate::tuning::Tuning;

/// Tree scale (platforms)
const TREE_SCALE: f32 = 2.0;
/// Bush scale
const BUSH_SCALE: f32 = 1.0;
/// Player sprite scale
const PLAYER_SCALE: f32 = 0.2;
/// Treasure sprite scale
const TREASURE_SCALE: f32 = 0.1;
/// Obstacle sprite scale
const OBSTACLE_SCALE: f32 = 0.1;

/// Upper bound on obstacles in one world
pub const MAX_OBSTACLES: usize = 64;

/// Number of obstacles for a viewport width
///
/// One per `obstacle_spacing` pixels; falls back to the default count when
/// that comes out as zero or the width is unusable. Never above
/// [`MAX_OBSTACLES`].
pub fn obstacle_count(width: f32, tuning: &Tuning) -> usize {
    let per_width = width / tuning.obstacle_spacing;
    let count = if per_width.is_finite() && per_width > 0.0 {
        per_width.floor().min(MAX_OBSTACLES as f32) as usize
    } else {
        0
    };
    if count == 0 {
        tuning.default_obstacle_count.min(MAX_OBSTACLES)
    } else {
        count
    }
}

/// Every entity of one session
#[derive(Debug, Clone)]
pub struct World {
    /// Size the world was laid out for
    pub viewport: Vec2,
    /// Decoration only, never collides
    pub background: Body,
    pub platforms: Vec<Body>,
    pub bushes: Vec<Body>,
    pub player: Body,
    pub obstacles: Vec<Body>,
    pub goal: Body,
}

impl World {
    /// Lay out scenery, player, obstacles and goal for `viewport`
    pub fn build(viewport: Vec2, tuning: &Tuning, ids: &mut IdAllocator) -> Self {
        let (width, height) = (viewport.x, viewport.y);

        // Background covers the viewport from the top-left corner
        let mut background = Body::fixed(ids.next_id(), AssetKey::Background, viewport * 0.5, 1.0);
        background.half_size = viewport * 0.5;

        let mut platforms = Vec::new();
        let mut bushes = Vec::new();
        for i in 0..tuning.scenery_columns {
            let x = i as f32 * width;
            platforms.push(Body::fixed(ids.next_id(), AssetKey::Tree, Vec2::new(x, height - 64.0), TREE_SCALE));
            bushes.push(Body::fixed(ids.next_id(), AssetKey::Bush, Vec2::new(x, height / 2.0), BUSH_SCALE));
            platforms.push(Body::fixed(ids.next_id(), AssetKey::Tree, Vec2::new(x, 0.0), TREE_SCALE));
            bushes.push(Body::fixed(ids.next_id(), AssetKey::Bush, Vec2::new(x, height / 4.0), BUSH_SCALE));
        }
        for i in 0..tuning.scenery_columns {
            let x = i as f32 * width;
            platforms.push(Body::fixed(ids.next_id(), AssetKey::Tree, Vec2::new(x, height - 64.0), TREE_SCALE));
            bushes.push(Body::fixed(
                ids.next_id(),
                AssetKey::Bush,
                Vec2::new(x, height - height / 4.0),
                BUSH_SCALE,
            ));
        }

        let player = Body::dynamic(ids.next_id(), AssetKey::Player, Vec2::new(100.0, height - 150.0), PLAYER_SCALE);

        let [start_x, start_y] = tuning.obstacle_start;
        let obstacles = (0..obstacle_count(width, tuning))
            .map(|i| {
                let pos = Vec2::new(start_x + i as f32 * tuning.obstacle_step_x, start_y);
                Body::dynamic(ids.next_id(), AssetKey::Dog, pos, OBSTACLE_SCALE)
            })
            .collect();

        let goal = Body::dynamic(
            ids.next_id(),
            AssetKey::Treasure,
            Vec2::new(width - 50.0, height - 150.0),
            TREASURE_SCALE,
        );

        log::debug!(
            "World built for {}x{} ({} platforms, {} bushes)",
            width,
            height,
            platforms.len(),
            bushes.len()
        );

        Self {
            viewport,
            background,
            platforms,
            bushes,
            player,
            obstacles,
            goal,
        }
    }

    /// Bodies of a collision group
    pub fn group(&self, group: Group) -> &[Body] {
        match group {
            Group::Player => slice::from_ref(&self.player),
            Group::Obstacles => &self.obstacles,
            Group::Goal => slice::from_ref(&self.goal),
            Group::Platforms => &self.platforms,
            Group::Bushes => &self.bushes,
        }
    }

    /// Mutable group `moving` alongside read-only group `fixed`
    fn split(&mut self, moving: Group, fixed: Group) -> Option<(&mut [Body], &[Body])> {
        if moving == fixed {
            return None;
        }
        let World {
            player,
            obstacles,
            goal,
            platforms,
            bushes,
            ..
        } = self;
        let slots: [(Group, &mut [Body]); 5] = [
            (Group::Player, slice::from_mut(player)),
            (Group::Obstacles, obstacles.as_mut_slice()),
            (Group::Goal, slice::from_mut(goal)),
            (Group::Platforms, platforms.as_mut_slice()),
            (Group::Bushes, bushes.as_mut_slice()),
        ];

        let mut moving_slot = None;
        let mut fixed_slot: Option<&[Body]> = None;
        for (group, bodies) in slots {
            if group == moving {
                moving_slot = Some(bodies);
            } else if group == fixed {
                fixed_slot = Some(&*bodies);
            }
        }
        Some((moving_slot?, fixed_slot?))
    }

    /// Advance every dynamic body
    pub fn integrate(&mut self, dt: f32) {
        self.player.integrate(dt);
        self.goal.integrate(dt);
        for obstacle in &mut self.obstacles {
            obstacle.integrate(dt);
        }
    }

    /// Push bodies of `moving` out of bodies of `fixed`; returns the hit count
    pub fn collide(&mut self, moving: Group, fixed: Group) -> usize {
        let Some((movers, walls)) = self.split(moving, fixed) else {
            return 0;
        };
        let mut hits = 0;
        for body in movers.iter_mut() {
            for wall in walls {
                if separate(body, wall).hit {
                    hits += 1;
                }
            }
        }
        hits
    }

    /// Overlapping pairs between two groups, in body order
    pub fn contacts(&self, a: Group, b: Group) -> Vec<Contact> {
        let mut contacts = Vec::new();
        for first in self.group(a) {
            for second in self.group(b) {
                if first.id != second.id && overlaps(first, second) {
                    contacts.push(Contact {
                        a: first.id,
                        b: second.id,
                    });
                }
            }
        }
        contacts
    }

    /// All bodies in draw order (back to front)
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        std::iter::once(&self.background)
            .chain(&self.platforms)
            .chain(&self.bushes)
            .chain(std::iter::once(&self.goal))
            .chain(&self.obstacles)
            .chain(std::iter::once(&self.player))
    }

    /// Ids of every entity in the world
    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.bodies().map(|b| b.id)
    }
}
