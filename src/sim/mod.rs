//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (registration order for handlers, layout order for bodies)
//! - No rendering or platform dependencies

pub mod body;
pub mod camera;
pub mod collision;
pub mod events;
pub mod session;
pub mod tick;
pub mod world;

pub use body::{Body, EntityId, Group, IdAllocator};
pub use camera::{Camera, Continuation};
pub use collision::{CollisionResult, overlaps, separate};
pub use events::{Contact, GameEvent, Subscriptions};
pub use session::{GamePhase, Session};
pub use tick::{TickInput, tick};
pub use world::{MAX_OBSTACLES, World, obstacle_count};
