//! CPU-side frame packing
//!
//! Turns a session into the uniform and storage data the SDF shader reads.
//! Kept free of wgpu so it can be tested natively.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::settings::Settings;
use crate::sim::{Body, Session};

/// Maximum number of sprites uploaded per frame
pub const MAX_SPRITES: usize = 128;

/// Sprites this far outside the view are skipped
const CULL_MARGIN: f32 = 64.0;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Globals {
    pub resolution: [f32; 2],   // offset 0 - framebuffer pixels
    pub view_size: [f32; 2],    // offset 8 - world pixels visible
    pub shake_offset: [f32; 2], // offset 16
    pub time: f32,              // offset 24
    pub sprite_count: u32,      // offset 28
    pub fade_color: [f32; 4],   // offset 32 (16-byte aligned for WGSL vec4)
    pub fade_alpha: f32,        // offset 48
    pub _pad: [f32; 3],         // pad to 64 bytes
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SpriteData {
    pub center: [f32; 2],
    pub half_size: [f32; 2],
    pub rotation: f32,
    pub kind: u32,
    pub _pad: [u32; 2], // Pad to 32 bytes for alignment
}

impl SpriteData {
    fn from_body(body: &Body) -> Self {
        Self {
            center: body.pos.to_array(),
            half_size: body.half_size.to_array(),
            rotation: body.rotation,
            kind: body.sprite.shader_kind(),
            _pad: [0; 2],
        }
    }
}

/// Everything uploaded for one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub globals: Globals,
    pub sprites: Vec<SpriteData>,
}

fn visible(body: &Body, view: Vec2) -> bool {
    let margin = Vec2::splat(CULL_MARGIN);
    let min = body.min() - margin;
    let max = body.max() + margin;
    max.x >= 0.0 && max.y >= 0.0 && min.x <= view.x && min.y <= view.y
}

impl Frame {
    /// Pack the session for drawing; `elapsed` is seconds since start
    pub fn build(session: &Session, settings: &Settings, resolution: (u32, u32), elapsed: f32) -> Self {
        let view = session.viewport();

        let sprites: Vec<SpriteData> = session
            .world
            .bodies()
            .filter(|b| visible(b, view))
            .take(MAX_SPRITES)
            .map(SpriteData::from_body)
            .collect();

        let shake_offset = if settings.effective_screen_shake() {
            session.camera.shake_offset()
        } else {
            Vec2::ZERO
        };

        let globals = Globals {
            resolution: [resolution.0 as f32, resolution.1 as f32],
            view_size: view.to_array(),
            shake_offset: shake_offset.to_array(),
            time: elapsed,
            sprite_count: sprites.len() as u32,
            fade_color: session.camera.fade_color(),
            fade_alpha: session.camera.fade_alpha(),
            _pad: [0.0; 3],
        };

        Self { globals, sprites }
    }
}
