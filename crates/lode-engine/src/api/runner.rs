use crate::api::config::EngineConfig;
use crate::api::game::{EngineContext, Game};
use crate::core::time::FixedTimestep;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::instance::RenderBuffer;

/// Drives a `Game` with a fixed timestep.
///
/// The host calls `push_input` as events arrive and `tick` once per frame,
/// then reads `render_buffer`.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext<G>,
    input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::with_max_steps(config.fixed_dt, config.max_steps_per_frame);
        let render_buffer = RenderBuffer::with_capacity(config.max_instances);

        Self {
            game,
            ctx: EngineContext::new(config),
            input: InputQueue::new(),
            render_buffer,
            timestep,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction; later calls do nothing.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.game.init(&mut self.ctx);
        self.initialized = true;
        log::info!(
            "game initialized: {}x{} view, dt {}s",
            self.ctx.config.render_width,
            self.ctx.config.render_height,
            self.ctx.config.fixed_dt
        );
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one host frame. Returns the number of fixed steps taken.
    pub fn tick(&mut self, frame_dt: f32) -> u32 {
        if !self.initialized {
            return 0;
        }

        let steps = self.timestep.accumulate(frame_dt);
        let dt = self.timestep.dt();
        for _ in 0..steps {
            self.game.update(&mut self.ctx, &self.input, dt);
            self.ctx.timers.tick(dt, &mut self.game);
            self.ctx.tweens.tick(dt, &mut self.game);
        }

        // Drain input after update
        self.input.drain();

        self.render_buffer.clear();
        self.game.render(&mut self.render_buffer);
        steps
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn context(&self) -> &EngineContext<G> {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EngineContext<G> {
        &mut self.ctx
    }

    pub fn config(&self) -> &EngineConfig {
        &self.ctx.config
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.render_buffer
    }

    /// Focus lost: forget held keys and pending events.
    pub fn reset_input(&mut self) {
        self.input.reset();
    }

    /// Fraction of a step left in the accumulator, for render interpolation.
    pub fn alpha(&self) -> f32 {
        self.timestep.alpha()
    }
}
