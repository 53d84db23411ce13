use glam::Vec2;

use crate::components::sprite::SpriteComponent;
use crate::core::geometry::{transform_points, Rect};
use crate::input::queue::InputQueue;
use crate::renderer::instance::RenderBuffer;
use crate::tilemap::Map;

/// Shared state every entity carries: placement, motion, hit shapes and sprite.
/// Game entities embed a `Body` and expose it through the `Entity` trait.
#[derive(Debug, Clone)]
pub struct Body {
    /// String tag for telling bodies apart in collision callbacks.
    pub tag: String,
    /// Inactive bodies are skipped by update, draw and collision dispatch.
    pub active: bool,
    /// Center in world space.
    pub position: Vec2,
    /// Displacement per tick, in pixels.
    pub speed: Vec2,
    /// Rotation in radians. Used by polygon collision and sprite drawing.
    pub rotation: f32,
    /// Axis-aligned hit box, re-centered on the position every tick.
    pub hit_box: Rect,
    /// Offset of the hit box center from the position.
    pub hitbox_offset: Vec2,
    /// Hit polygon relative to the position, before rotation.
    /// Empty means the rotated hit box is used for polygon tests.
    pub hit_poly: Vec<Vec2>,
    pub sprite: Option<SpriteComponent>,
}

impl Body {
    pub fn new(hit_width: i32, hit_height: i32) -> Self {
        Self {
            tag: String::new(),
            active: false,
            position: Vec2::ZERO,
            speed: Vec2::ZERO,
            rotation: 0.0,
            hit_box: Rect::new(0, 0, hit_width, hit_height),
            hitbox_offset: Vec2::ZERO,
            hit_poly: Vec::new(),
            sprite: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self.sync_hit_box();
        self
    }

    pub fn with_speed(mut self, speed: Vec2) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_hitbox_offset(mut self, offset: Vec2) -> Self {
        self.hitbox_offset = offset;
        self.sync_hit_box();
        self
    }

    pub fn with_hit_poly(mut self, points: Vec<Vec2>) -> Self {
        self.hit_poly = points;
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteComponent) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Move by one tick of speed and re-center the hit box.
    pub fn advance(&mut self) {
        self.position += self.speed;
        self.sync_hit_box();
    }

    /// Place the hit box around the truncated position plus offset.
    pub fn sync_hit_box(&mut self) {
        self.hit_box.x =
            self.position.x as i32 - self.hit_box.width / 2 + self.hitbox_offset.x as i32;
        self.hit_box.y =
            self.position.y as i32 - self.hit_box.height / 2 + self.hitbox_offset.y as i32;
    }

    /// Hit shape in world space: the rotated hit polygon, or the hit box rotated
    /// about the position when no polygon is set.
    pub fn world_polygon(&self) -> Vec<Vec2> {
        if self.hit_poly.is_empty() {
            let local: Vec<Vec2> = self.hit_box.corners().iter().map(|&c| c - self.position).collect();
            transform_points(&local, self.rotation, self.position)
        } else {
            transform_points(&self.hit_poly, self.rotation, self.position)
        }
    }
}

/// Polymorphic entity behavior. Implementors own a `Body`.
///
/// Default methods give a passive entity: it drifts by its speed, draws its
/// sprite (if any) and ignores input and collisions.
pub trait Entity: 'static {
    fn body(&self) -> &Body;

    fn body_mut(&mut self) -> &mut Body;

    fn is_active(&self) -> bool {
        self.body().active
    }

    /// Per-tick logic. `map` is available for terrain queries.
    fn update(&mut self, _dt: f32, _map: Option<&Map>) {
        self.body_mut().advance();
    }

    fn handle_input(&mut self, _input: &InputQueue) {}

    /// Restore defaults before the slot is reused by a pool spawn.
    fn reset(&mut self) {}

    fn draw(&self, buffer: &mut RenderBuffer) {
        let body = self.body();
        if let Some(sprite) = &body.sprite {
            buffer.push_sprite(sprite, body.position, body.rotation);
        }
    }

    /// Hit boxes overlap. `overlap` is the intersection rectangle.
    fn on_box_collision(&mut self, _other: &Body, _overlap: Rect) {}

    /// Hit polygons overlap.
    fn on_poly_collision(&mut self, _other: &Body) {}
}

/// A bare body is a passive entity (walls, triggers, pickups without logic).
impl Entity for Body {
    fn body(&self) -> &Body {
        self
    }

    fn body_mut(&mut self) -> &mut Body {
        self
    }
}
