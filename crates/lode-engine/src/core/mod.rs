pub mod geometry;
pub mod rng;
pub mod scene;
pub mod time;

pub use geometry::Rect;
pub use rng::Rng;
pub use scene::{CollisionMode, CollisionTarget, Scene};
pub use time::FixedTimestep;
