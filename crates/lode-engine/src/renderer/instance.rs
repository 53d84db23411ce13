use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::components::sprite::{AtlasId, BlendMode, Color, SpriteComponent};
use crate::core::geometry::Rect;

/// Per-instance render data read by the host renderer.
/// 16 words = 64 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// X position in world space (pivot location).
    pub x: f32,
    /// Y position in world space (pivot location).
    pub y: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// Uniform scale applied to the source size.
    pub scale: f32,
    /// Source rectangle in atlas pixels: x, y, width, height.
    pub src: [f32; 4],
    /// Tint and opacity: r, g, b, a.
    pub color: [f32; 4],
    /// Pivot in source pixels.
    pub origin: [f32; 2],
    /// Atlas index (see AtlasRegistry).
    pub atlas: u32,
    /// Blend mode discriminant, mirrors the enclosing batch.
    pub blend: u32,
}

impl RenderInstance {
    pub const WORDS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::WORDS * 4;

    /// Instance for a source region drawn with its top-left at `pos`.
    pub fn tile(atlas: AtlasId, src: Rect, pos: Vec2, color: Color, alpha: f32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            rotation: 0.0,
            scale: 1.0,
            src: rect_words(src),
            color: [color.r, color.g, color.b, alpha],
            origin: [0.0, 0.0],
            atlas: atlas.0,
            blend: BlendMode::Alpha as u32,
        }
    }

    pub fn from_sprite(sprite: &SpriteComponent, pos: Vec2, rotation: f32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            rotation,
            scale: sprite.scale,
            src: rect_words(sprite.source),
            color: [sprite.tint.r, sprite.tint.g, sprite.tint.b, sprite.alpha],
            origin: [sprite.origin.x, sprite.origin.y],
            atlas: sprite.atlas.0,
            blend: sprite.blend as u32,
        }
    }
}

fn rect_words(r: Rect) -> [f32; 4] {
    [r.x as f32, r.y as f32, r.width as f32, r.height as f32]
}

/// A contiguous run of instances sharing one blend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderBatch {
    pub blend: BlendMode,
    /// First instance index (inclusive).
    pub start: u32,
    /// Last instance index (exclusive).
    pub end: u32,
}

impl RenderBatch {
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Render buffer containing all sprite instances and their blend batches.
pub struct RenderBuffer {
    /// Sprite instances in draw order.
    pub instances: Vec<RenderInstance>,
    batches: Vec<RenderBatch>,
    max_instances: usize,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    pub fn with_capacity(max_instances: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max_instances.min(4096)),
            batches: Vec::new(),
            max_instances,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.batches.clear();
    }

    /// Append an instance, extending the last batch when the blend mode matches.
    /// Returns false (and drops the instance) once the buffer is full.
    pub fn push(&mut self, blend: BlendMode, mut instance: RenderInstance) -> bool {
        if self.instances.len() >= self.max_instances {
            return false;
        }
        instance.blend = blend as u32;
        let index = self.instances.len() as u32;
        self.instances.push(instance);
        match self.batches.last_mut() {
            Some(batch) if batch.blend == blend && batch.end == index => batch.end = index + 1,
            _ => self.batches.push(RenderBatch { blend, start: index, end: index + 1 }),
        }
        true
    }

    /// Draw a sprite with its pivot at `pos`.
    pub fn push_sprite(&mut self, sprite: &SpriteComponent, pos: Vec2, rotation: f32) -> bool {
        self.push(sprite.blend, RenderInstance::from_sprite(sprite, pos, rotation))
    }

    pub fn batches(&self) -> &[RenderBatch] {
        &self.batches
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn is_full(&self) -> bool {
        self.instances.len() >= self.max_instances
    }

    /// Raw instance words, for uploading to a vertex buffer.
    pub fn as_words(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
