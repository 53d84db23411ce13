pub mod animation;
pub mod entity;
pub mod pool;
pub mod sprite;

pub use animation::{AnimationDirection, SpriteAnimation};
pub use entity::{Body, Entity};
pub use pool::EntityPool;
pub use sprite::{AtlasId, BlendMode, Color, SpriteComponent};
