use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::geometry::Rect;

/// Identifies which texture atlas a sprite belongs to.
/// Index into the AtlasRegistry's path list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AtlasId(pub u32);

/// Blend mode for sprite rendering.
/// Declaration order is the order particle batches are drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Standard alpha blending (src-alpha, one-minus-src-alpha).
    #[default]
    Alpha,
    /// Additive blending for glow effects (src-alpha, one).
    Additive,
    /// Multiplicative blending for darkening (dst-color, zero).
    Multiplicative,
}

impl BlendMode {
    pub const ALL: [BlendMode; 3] = [BlendMode::Alpha, BlendMode::Additive, BlendMode::Multiplicative];
}

/// Straight (non-premultiplied) RGB tint in 0..1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// How an entity appears: an atlas region plus tint, blend and pivot.
#[derive(Debug, Clone)]
pub struct SpriteComponent {
    /// Which atlas this sprite belongs to.
    pub atlas: AtlasId,
    /// Source region in atlas pixels.
    pub source: Rect,
    /// Tint color.
    pub tint: Color,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    /// Blend mode for rendering.
    pub blend: BlendMode,
    /// Uniform scale applied to the source size.
    pub scale: f32,
    /// Pivot in source pixels, relative to the source top-left.
    pub origin: Vec2,
}

impl SpriteComponent {
    pub fn new(atlas: AtlasId, source: Rect) -> Self {
        Self {
            atlas,
            source,
            origin: Vec2::new(source.width as f32 / 2.0, source.height as f32 / 2.0),
            ..Default::default()
        }
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for SpriteComponent {
    fn default() -> Self {
        Self {
            atlas: AtlasId(0),
            source: Rect::default(),
            tint: Color::WHITE,
            alpha: 1.0,
            blend: BlendMode::Alpha,
            scale: 1.0,
            origin: Vec2::ZERO,
        }
    }
}
