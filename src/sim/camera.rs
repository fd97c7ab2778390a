//! Camera effects: shake and fade-out
//!
//! A fade can carry a continuation that is handed back exactly once, on the
//! tick the fade reaches full opacity.

use glam::Vec2;
use rand::Rng;

/// Work scheduled to run when a fade completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    Restart,
}

#[derive(Debug, Clone)]
struct Shake {
    elapsed: f32,
    duration: f32,
    /// Fraction of the viewport
    intensity: f32,
}

#[derive(Debug, Clone)]
struct Fade {
    elapsed: f32,
    duration: f32,
    color: [f32; 4],
    on_complete: Option<Continuation>,
}

impl Fade {
    fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }
}

/// Main camera effect state
#[derive(Debug, Clone, Default)]
pub struct Camera {
    shake: Option<Shake>,
    fade: Option<Fade>,
    /// Current shake displacement in pixels
    shake_offset: Vec2,
}

impl Camera {
    /// Start shaking; ignored while a shake is running
    pub fn shake(&mut self, duration: f32, intensity: f32) -> bool {
        if self.shake.is_some() {
            return false;
        }
        self.shake = Some(Shake {
            elapsed: 0.0,
            duration,
            intensity,
        });
        true
    }

    /// Start fading to `color`; ignored while a fade is running or held
    pub fn fade_out(&mut self, duration: f32, color: [f32; 4], on_complete: Option<Continuation>) -> bool {
        if self.fade.is_some() {
            return false;
        }
        self.fade = Some(Fade {
            elapsed: 0.0,
            duration,
            color,
            on_complete,
        });
        true
    }

    /// Advance effects; returns the fade continuation on the completing tick
    pub fn update<R: Rng>(&mut self, dt: f32, viewport: Vec2, rng: &mut R) -> Option<Continuation> {
        if let Some(shake) = &mut self.shake {
            shake.elapsed += dt;
            if shake.elapsed >= shake.duration {
                self.shake = None;
                self.shake_offset = Vec2::ZERO;
            } else {
                let reach = viewport * shake.intensity;
                self.shake_offset = Vec2::new(
                    rng.random::<f32>() * reach.x * 2.0 - reach.x,
                    rng.random::<f32>() * reach.y * 2.0 - reach.y,
                );
            }
        }

        let fade = self.fade.as_mut()?;
        if fade.elapsed >= fade.duration {
            // Held at full opacity until the camera is reset
            return None;
        }
        fade.elapsed += dt;
        if fade.elapsed >= fade.duration {
            fade.on_complete.take()
        } else {
            None
        }
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_some()
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }

    /// Fade opacity (0 = clear, 1 = fully faded)
    pub fn fade_alpha(&self) -> f32 {
        self.fade.as_ref().map_or(0.0, Fade::progress)
    }

    /// Fade colour (white when no fade is active)
    pub fn fade_color(&self) -> [f32; 4] {
        self.fade.as_ref().map_or([1.0; 4], |f| f.color)
    }
}
