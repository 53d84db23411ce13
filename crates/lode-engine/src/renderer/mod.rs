pub mod camera;
pub mod instance;

pub use camera::{Camera, CameraUniform};
pub use instance::{RenderBatch, RenderBuffer, RenderInstance};
