pub mod registry;

pub use registry::AtlasRegistry;
