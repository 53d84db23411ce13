use glam::Vec2;

use crate::components::sprite::{AtlasId, BlendMode, Color};
use crate::core::geometry::Rect;
use crate::core::rng::Rng;
use crate::core::time::reached;
use crate::renderer::instance::{RenderBuffer, RenderInstance};
use crate::tilemap::Map;

/// Default slot count.
pub const MAX_PARTICLES: usize = 3000;
/// Default downward acceleration, in pixels per tick per second.
pub const DEFAULT_PARTICLE_GRAVITY: f32 = 3.0;

/// Lifecycle phase. Particles only ever move forward; `Done` marks a free slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticlePhase {
    Attack,
    Alive,
    Decay,
    #[default]
    Done,
}

/// Per-tick behavior hook, run after the phase advances.
pub type ParticleFn = fn(&mut Particle);

/// Fade in over Attack, hold during Alive, fade out over Decay.
pub fn fade_in_out(p: &mut Particle) {
    match p.phase {
        ParticlePhase::Attack => p.alpha = p.attack_value,
        ParticlePhase::Alive => p.alpha = 1.0,
        ParticlePhase::Decay => p.alpha = 1.0 - p.decay_value,
        ParticlePhase::Done => {}
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    /// Displacement per tick, in pixels.
    pub velocity: Vec2,
    pub phase: ParticlePhase,
    pub gravity: bool,
    /// Bounce off solid map pixels.
    pub collides: bool,
    /// Phase durations in seconds.
    pub attack_time: f32,
    pub life_time: f32,
    pub decay_time: f32,
    /// Time spent in the current phase.
    pub elapsed: f32,
    /// Normalized progress through each phase.
    pub attack_value: f32,
    pub life_value: f32,
    pub decay_value: f32,
    pub alpha: f32,
    pub scale: f32,
    pub rotation: f32,
    pub color: Color,
    /// Region of the particle atlas.
    pub source: Rect,
    pub blend: BlendMode,
    pub behavior: ParticleFn,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            phase: ParticlePhase::Done,
            gravity: false,
            collides: false,
            attack_time: 0.0,
            life_time: 0.0,
            decay_time: 0.0,
            elapsed: 0.0,
            attack_value: 0.0,
            life_value: 0.0,
            decay_value: 0.0,
            alpha: 1.0,
            scale: 1.0,
            rotation: 0.0,
            color: Color::WHITE,
            source: Rect::default(),
            blend: BlendMode::Alpha,
            behavior: fade_in_out,
        }
    }
}

impl Particle {
    pub fn is_active(&self) -> bool {
        self.phase != ParticlePhase::Done
    }

    /// Progress through a phase. A zero-length phase is already complete.
    fn progress(elapsed: f32, duration: f32) -> f32 {
        if duration <= 0.0 {
            1.0
        } else {
            elapsed / duration
        }
    }

    /// Move to the next phase once the current one is complete. Overshoot is dropped.
    fn advance_phase(&mut self) {
        match self.phase {
            ParticlePhase::Attack => {
                self.attack_value = Self::progress(self.elapsed, self.attack_time);
                if reached(self.elapsed, self.attack_time) {
                    self.attack_value = 1.0;
                    self.elapsed = 0.0;
                    self.phase = ParticlePhase::Alive;
                }
            }
            ParticlePhase::Alive => {
                self.life_value = Self::progress(self.elapsed, self.life_time);
                if reached(self.elapsed, self.life_time) {
                    self.life_value = 1.0;
                    self.elapsed = 0.0;
                    self.phase = ParticlePhase::Decay;
                }
            }
            ParticlePhase::Decay => {
                self.decay_value = Self::progress(self.elapsed, self.decay_time);
                if reached(self.elapsed, self.decay_time) {
                    self.decay_value = 1.0;
                    self.elapsed = 0.0;
                    self.phase = ParticlePhase::Done;
                }
            }
            ParticlePhase::Done => {}
        }
    }
}

/// Everything needed to start a particle. Built with chained setters.
#[derive(Debug, Clone)]
pub struct ParticleSpawn {
    pub position: Vec2,
    pub velocity: Vec2,
    pub attack_time: f32,
    pub life_time: f32,
    pub decay_time: f32,
    pub gravity: bool,
    pub collides: bool,
    pub source: Rect,
    pub color: Color,
    pub blend: BlendMode,
    pub scale: f32,
    pub rotation: f32,
    pub behavior: ParticleFn,
}

impl ParticleSpawn {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            attack_time: 0.0,
            life_time: 1.0,
            decay_time: 0.0,
            gravity: false,
            collides: false,
            source: Rect::default(),
            color: Color::WHITE,
            blend: BlendMode::Alpha,
            scale: 1.0,
            rotation: 0.0,
            behavior: fade_in_out,
        }
    }

    /// Attack, alive and decay durations in seconds.
    pub fn with_times(mut self, attack: f32, life: f32, decay: f32) -> Self {
        self.attack_time = attack;
        self.life_time = life;
        self.decay_time = decay;
        self
    }

    pub fn with_gravity(mut self, gravity: bool) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_collision(mut self, collides: bool) -> Self {
        self.collides = collides;
        self
    }

    pub fn with_source(mut self, source: Rect) -> Self {
        self.source = source;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_behavior(mut self, behavior: ParticleFn) -> Self {
        self.behavior = behavior;
        self
    }
}

/// Fixed pool of particles sharing one atlas.
pub struct ParticleController {
    particles: Vec<Particle>,
    atlas: AtlasId,
    gravity: f32,
}

impl ParticleController {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: vec![Particle::default(); capacity],
            atlas: AtlasId(0),
            gravity: DEFAULT_PARTICLE_GRAVITY,
        }
    }

    pub fn with_atlas(mut self, atlas: AtlasId) -> Self {
        self.atlas = atlas;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Start a particle in the first free slot. Returns false, doing nothing, when all are live.
    pub fn add(&mut self, spawn: ParticleSpawn) -> bool {
        let Some(index) = self.particles.iter().position(|p| !p.is_active()) else {
            log::debug!("particle pool exhausted ({} slots)", self.particles.len());
            return false;
        };
        let p = &mut self.particles[index];
        *p = Particle {
            position: spawn.position,
            velocity: spawn.velocity,
            phase: ParticlePhase::Attack,
            gravity: spawn.gravity,
            collides: spawn.collides,
            attack_time: spawn.attack_time,
            life_time: spawn.life_time,
            decay_time: spawn.decay_time,
            elapsed: 0.0,
            attack_value: 0.0,
            life_value: 0.0,
            decay_value: 0.0,
            alpha: 1.0,
            scale: spawn.scale,
            rotation: spawn.rotation,
            color: spawn.color,
            source: spawn.source,
            blend: spawn.blend,
            behavior: spawn.behavior,
        };
        (p.behavior)(p);
        true
    }

    pub fn update(&mut self, dt: f32, map: Option<&Map>, rng: &mut Rng) {
        let gravity = self.gravity * dt;
        for p in self.particles.iter_mut().filter(|p| p.is_active()) {
            p.elapsed += dt;
            if p.gravity {
                p.velocity.y += gravity;
            }
            if p.collides {
                if let Some(map) = map {
                    bounce(p, map, rng);
                }
            }
            p.position += p.velocity;
            p.advance_phase();
            (p.behavior)(p);
        }
    }

    /// Push live particles grouped by blend mode: alpha, then additive, then multiplicative.
    pub fn draw(&self, buffer: &mut RenderBuffer) {
        for blend in BlendMode::ALL {
            for p in self.particles.iter().filter(|p| p.is_active() && p.blend == blend) {
                let instance = RenderInstance {
                    x: p.position.x,
                    y: p.position.y,
                    rotation: p.rotation,
                    scale: p.scale,
                    src: [
                        p.source.x as f32,
                        p.source.y as f32,
                        p.source.width as f32,
                        p.source.height as f32,
                    ],
                    color: [p.color.r, p.color.g, p.color.b, p.alpha],
                    origin: [p.source.width as f32 / 2.0, p.source.height as f32 / 2.0],
                    atlas: self.atlas.0,
                    blend: blend as u32,
                };
                if !buffer.push(blend, instance) {
                    return;
                }
            }
        }
    }

    /// Free every slot.
    pub fn reset(&mut self) {
        for p in &mut self.particles {
            p.phase = ParticlePhase::Done;
        }
    }

    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_active()).count()
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.is_active())
    }
}

impl Default for ParticleController {
    fn default() -> Self {
        Self::new(MAX_PARTICLES)
    }
}

/// Reflect off solid pixels one axis at a time, losing energy on the bounce.
fn bounce(p: &mut Particle, map: &Map, rng: &mut Rng) {
    let ahead_x = p.position + Vec2::new(p.velocity.x, 0.0);
    if map.check_collision(ahead_x).unwrap_or(false) {
        p.velocity.x = -(p.velocity.x * (0.1 + rng.next_f32() * 0.4));
        p.velocity.y *= 0.9;
    }
    let ahead_y = p.position + Vec2::new(0.0, p.velocity.y);
    if map.check_collision(ahead_y).unwrap_or(false) {
        p.velocity.y = -(p.velocity.y * (0.1 + rng.next_f32() * 0.4));
        p.velocity.x *= 0.9;
    }
}
