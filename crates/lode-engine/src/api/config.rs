use serde::{Deserialize, Serialize};

/// Engine tuning, usually shipped next to the game's assets as JSON.
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed simulation step in seconds.
    pub fixed_dt: f32,
    /// Steps run at most per host frame; the rest of the backlog is dropped.
    pub max_steps_per_frame: u32,
    /// Viewport size in world pixels.
    pub render_width: u32,
    pub render_height: u32,
    pub max_particles: usize,
    /// Particle downward acceleration, in pixels per tick per second.
    pub particle_gravity: f32,
    /// Camera follow factor per update, 0..1.
    pub camera_speed: f32,
    /// Extra pixels drawn past each viewport edge.
    pub tile_draw_margin: f32,
    pub max_instances: usize,
    pub rng_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            render_width: 320,
            render_height: 180,
            max_particles: 3000,
            particle_gravity: 3.0,
            camera_speed: 0.2,
            tile_draw_margin: 200.0,
            max_instances: 4096,
            rng_seed: 42,
        }
    }
}

impl EngineConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
