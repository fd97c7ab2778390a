//! Sprite manifest
//!
//! Seven named sprites, each with the file it was drawn from and its nominal
//! texture size. Bodies are sized as `texture size * scale`, so these numbers
//! drive collision boxes. Pixels are never decoded; the renderer draws each
//! key procedurally.

use glam::Vec2;

/// Sprite keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Background,
    Tree,
    Bush,
    Grass,
    Treasure,
    Dog,
    Player,
}

impl AssetKey {
    /// Every key, in load order
    pub const ALL: [AssetKey; 7] = [
        AssetKey::Background,
        AssetKey::Tree,
        AssetKey::Bush,
        AssetKey::Grass,
        AssetKey::Treasure,
        AssetKey::Dog,
        AssetKey::Player,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKey::Background => "background",
            AssetKey::Tree => "tree",
            AssetKey::Bush => "bush",
            AssetKey::Grass => "grass",
            AssetKey::Treasure => "treasure",
            AssetKey::Dog => "dog",
            AssetKey::Player => "player",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Source image path
    pub fn path(&self) -> &'static str {
        match self {
            AssetKey::Background => "assets/game_background.png",
            AssetKey::Tree => "assets/tree.png",
            AssetKey::Bush => "assets/bush.png",
            AssetKey::Grass => "assets/grass.png",
            AssetKey::Treasure => "assets/Chest.png",
            AssetKey::Dog => "assets/dog.png",
            AssetKey::Player => "assets/Hunter.png",
        }
    }

    /// Nominal texture size in pixels (unscaled)
    pub fn texture_size(&self) -> Vec2 {
        match self {
            AssetKey::Background => Vec2::new(1920.0, 1080.0),
            AssetKey::Tree => Vec2::new(48.0, 64.0),
            AssetKey::Bush => Vec2::new(64.0, 40.0),
            AssetKey::Grass => Vec2::new(64.0, 64.0),
            AssetKey::Treasure => Vec2::new(512.0, 400.0),
            AssetKey::Dog => Vec2::new(500.0, 500.0),
            AssetKey::Player => Vec2::new(400.0, 500.0),
        }
    }

    /// Half extents of a sprite drawn at `scale`
    pub fn half_size(&self, scale: f32) -> Vec2 {
        self.texture_size() * scale * 0.5
    }

    /// Index used by the shader to pick a shape
    pub fn shader_kind(&self) -> u32 {
        *self as u32
    }
}
