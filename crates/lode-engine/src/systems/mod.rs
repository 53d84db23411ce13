pub mod particles;

pub use particles::{fade_in_out, Particle, ParticleController, ParticleFn, ParticlePhase, ParticleSpawn};
