use crate::api::config::EngineConfig;
use crate::core::rng::Rng;
use crate::extensions::timer::TimerController;
use crate::extensions::tween::TweenController;
use crate::input::queue::InputQueue;
use crate::renderer::camera::Camera;
use crate::renderer::instance::RenderBuffer;
use crate::systems::particles::ParticleController;
use crate::tilemap::Map;

/// The contract every game fulfills. The game owns its scene, map, camera and
/// particles; the engine owns the clock, the schedulers and the render buffer.
pub trait Game: Sized {
    /// Engine configuration. Called once before init.
    fn config(&self) -> EngineConfig {
        EngineConfig::default()
    }

    /// Load content, build pools, start timers.
    fn init(&mut self, ctx: &mut EngineContext<Self>);

    /// One fixed step. Timers and tweens run right after, with the same `dt`.
    fn update(&mut self, ctx: &mut EngineContext<Self>, input: &InputQueue, dt: f32);

    /// Fill the render buffer. It is cleared before every call.
    fn render(&self, buffer: &mut RenderBuffer);
}

/// Engine services handed to the game. Timer and tween callbacks receive the game itself.
pub struct EngineContext<G> {
    pub timers: TimerController<G>,
    pub tweens: TweenController<G>,
    pub rng: Rng,
    pub config: EngineConfig,
}

impl<G> EngineContext<G> {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            timers: TimerController::new(),
            tweens: TweenController::new(),
            rng: Rng::new(config.rng_seed),
            config,
        }
    }

    /// A camera sized to the viewport, clamped to the map when one is given.
    pub fn camera(&self, map: Option<&Map>) -> Camera {
        let (w, h) = (self.config.render_width, self.config.render_height);
        let camera = match map {
            Some(map) => Camera::for_map(w, h, map),
            None => Camera::new(w, h),
        };
        camera.with_speed(self.config.camera_speed)
    }

    pub fn particles(&self) -> ParticleController {
        ParticleController::new(self.config.max_particles).with_gravity(self.config.particle_gravity)
    }

    /// Apply the configured draw margin to a freshly loaded map.
    pub fn prepare_map(&self, map: &mut Map) {
        map.set_draw_margin(self.config.tile_draw_margin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_follows_config() {
        let config = EngineConfig {
            render_width: 100,
            render_height: 50,
            max_particles: 12,
            camera_speed: 0.5,
            ..Default::default()
        };
        let ctx = EngineContext::<()>::new(config);
        assert_eq!(ctx.particles().capacity(), 12);

        let camera = ctx.camera(None);
        assert_eq!((camera.width, camera.height), (100, 50));
        assert_eq!(camera.speed, 0.5);
        assert!(ctx.timers.is_empty() && ctx.tweens.is_empty());
    }
}
