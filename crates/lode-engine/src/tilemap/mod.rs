//! Tile maps: tilesets, tile/object layers, per-pixel collision masks and culled drawing.

pub mod builder;
pub mod layer;
#[cfg(feature = "tmx")]
mod loader;
pub mod map;
pub mod mask;
pub mod properties;
pub mod tileset;

pub use builder::MapBuilder;
pub use layer::{Layer, MapObject, ObjectLayer, TileLayer, COLLISION_PROPERTY, SHADOWS_PROPERTY};
pub use map::{Map, TileWindow, DEFAULT_DRAW_MARGIN, SHADOW_ALPHA, SHADOW_OFFSET};
pub use mask::CollisionMask;
pub use properties::{PropertyCollection, PropertyValue};
pub use tileset::{Tile, Tileset, COLLISION_SET_PREFIX};
