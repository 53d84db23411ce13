pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod error;
pub mod extensions;
pub mod input;
pub mod renderer;
pub mod systems;
pub mod tilemap;

// Re-export key types at crate root for convenience
pub use api::config::EngineConfig;
pub use api::game::{EngineContext, Game};
pub use api::runner::GameRunner;
pub use api::types::{PoolId, ScheduleId, SingleId, SlotId};
pub use assets::registry::AtlasRegistry;
pub use components::animation::SpriteAnimation;
pub use components::entity::{Body, Entity};
pub use components::pool::EntityPool;
pub use components::sprite::{AtlasId, BlendMode, Color, SpriteComponent};
pub use core::geometry::Rect;
pub use core::rng::Rng;
pub use core::scene::{CollisionMode, CollisionTarget, Scene};
pub use core::time::FixedTimestep;
pub use error::MapError;
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::camera::Camera;
pub use renderer::instance::{RenderBatch, RenderBuffer, RenderInstance};
pub use systems::particles::{ParticleController, ParticlePhase, ParticleSpawn};
pub use tilemap::{Map, MapBuilder};

pub use extensions::{
    ease, lerp, lerp_vec2, Easing,
    TimerController, TweenController, TweenDirection,
};
