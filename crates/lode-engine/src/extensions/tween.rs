// extensions/tween.rs
//
// Eased 0..1 values driven over time, delivered to a callback each tick.
//
// Usage:
//   let mut tweens = TweenController::<MyGame>::new();
//   tweens.create("fade", Easing::QuadOut, 0.5, false, false, |game, v| game.fade = v);
//   tweens.tick(dt, &mut game);

use crate::api::types::ScheduleId;
use crate::core::time::reached;

use super::easing::Easing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenState {
    #[default]
    Running,
    Paused,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenDirection {
    #[default]
    Forward,
    Reverse,
}

pub struct Tween<C> {
    pub id: ScheduleId,
    pub name: String,
    pub easing: Easing,
    /// Seconds per leg. Half the requested duration when ping-ponging.
    pub leg: f32,
    /// Position within the current leg, 0..=leg.
    pub time: f32,
    pub ping_pong: bool,
    pub looping: bool,
    pub direction: TweenDirection,
    pub initial_direction: TweenDirection,
    pub state: TweenState,
    /// Last eased value passed to the callback.
    pub value: f32,
    callback: Box<dyn FnMut(&mut C, f32)>,
}

impl<C> Tween<C> {
    /// Linear progress through the leg.
    pub fn progress(&self) -> f32 {
        if self.leg > 0.0 {
            self.time / self.leg
        } else {
            match self.direction {
                TweenDirection::Forward => 1.0,
                TweenDirection::Reverse => 0.0,
            }
        }
    }

    fn tick(&mut self, dt: f32, ctx: &mut C) {
        if self.state != TweenState::Running {
            return;
        }
        match self.direction {
            TweenDirection::Forward => {
                self.time += dt;
                if reached(self.time, self.leg) {
                    let overshoot = (self.time - self.leg).max(0.0);
                    if self.ping_pong {
                        if self.initial_direction == TweenDirection::Reverse && !self.looping {
                            self.finish(self.leg);
                        } else {
                            self.direction = TweenDirection::Reverse;
                            // Overshoot reflects at the upper bound too, not only at zero,
                            // so both halves of a cycle keep the same length.
                            self.time = (self.leg - overshoot).max(0.0);
                        }
                    } else if self.looping {
                        self.time = overshoot.min(self.leg);
                    } else {
                        self.finish(self.leg);
                    }
                }
            }
            TweenDirection::Reverse => {
                self.time -= dt;
                if reached(self.leg - self.time, self.leg) {
                    let overshoot = (-self.time).max(0.0);
                    if self.ping_pong {
                        if self.initial_direction == TweenDirection::Forward && !self.looping {
                            self.finish(0.0);
                        } else {
                            self.direction = TweenDirection::Forward;
                            self.time = overshoot.min(self.leg);
                        }
                    } else if self.looping {
                        self.time = (self.leg - overshoot).max(0.0);
                    } else {
                        self.finish(0.0);
                    }
                }
            }
        }
        self.value = self.easing.apply(self.progress());
        (self.callback)(ctx, self.value);
    }

    fn finish(&mut self, time: f32) {
        self.time = time;
        self.state = TweenState::Finished;
    }
}

pub struct TweenController<C> {
    tweens: Vec<Tween<C>>,
    next_id: u32,
}

impl<C> TweenController<C> {
    pub fn new() -> Self {
        Self {
            tweens: Vec::new(),
            next_id: 0,
        }
    }

    /// Start a tween at 0 moving forward. With `ping_pong`, `duration` covers
    /// the whole forward and back cycle.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        easing: Easing,
        duration: f32,
        ping_pong: bool,
        looping: bool,
        callback: impl FnMut(&mut C, f32) + 'static,
    ) -> ScheduleId {
        self.spawn(name.into(), easing, duration, ping_pong, looping, TweenDirection::Forward, Box::new(callback))
    }

    /// Start a tween at its end moving backward.
    pub fn create_reversed(
        &mut self,
        name: impl Into<String>,
        easing: Easing,
        duration: f32,
        ping_pong: bool,
        looping: bool,
        callback: impl FnMut(&mut C, f32) + 'static,
    ) -> ScheduleId {
        self.spawn(name.into(), easing, duration, ping_pong, looping, TweenDirection::Reverse, Box::new(callback))
    }

    #[allow(clippy::too_many_arguments)]
    fn spawn(
        &mut self,
        name: String,
        easing: Easing,
        duration: f32,
        ping_pong: bool,
        looping: bool,
        direction: TweenDirection,
        callback: Box<dyn FnMut(&mut C, f32)>,
    ) -> ScheduleId {
        let id = ScheduleId(self.next_id);
        self.next_id += 1;
        let leg = if ping_pong { duration / 2.0 } else { duration };
        log::debug!(
            "tween {:?} '{}' {}s {:?} (ping-pong: {}, looping: {})",
            id, name, duration, direction, ping_pong, looping
        );
        self.tweens.push(Tween {
            id,
            name,
            easing,
            leg,
            time: match direction {
                TweenDirection::Forward => 0.0,
                TweenDirection::Reverse => leg,
            },
            ping_pong,
            looping,
            direction,
            initial_direction: direction,
            state: TweenState::Running,
            value: 0.0,
            callback,
        });
        id
    }

    /// Advance every running tween, then drop the finished ones.
    pub fn tick(&mut self, dt: f32, ctx: &mut C) {
        for tween in &mut self.tweens {
            tween.tick(dt, ctx);
        }
        let before = self.tweens.len();
        self.tweens.retain(|t| t.state != TweenState::Finished);
        let pruned = before - self.tweens.len();
        if pruned > 0 {
            log::debug!("pruned {} finished tween(s)", pruned);
        }
    }

    pub fn get(&self, id: ScheduleId) -> Option<&Tween<C>> {
        self.tweens.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: ScheduleId) -> Option<&mut Tween<C>> {
        self.tweens.iter_mut().find(|t| t.id == id)
    }

    pub fn find(&self, name: &str) -> Option<&Tween<C>> {
        self.tweens.iter().find(|t| t.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Tween<C>> {
        self.tweens.iter_mut().find(|t| t.name == name)
    }

    pub fn pause(&mut self, id: ScheduleId) -> bool {
        self.set_state(id, TweenState::Paused)
    }

    pub fn resume(&mut self, id: ScheduleId) -> bool {
        self.set_state(id, TweenState::Running)
    }

    /// Mark finished; removed on the next tick without another callback.
    pub fn kill(&mut self, id: ScheduleId) -> bool {
        self.set_state(id, TweenState::Finished)
    }

    fn set_state(&mut self, id: ScheduleId, state: TweenState) -> bool {
        match self.get_mut(id) {
            Some(tween) if tween.state != TweenState::Finished => {
                tween.state = state;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}

impl<C> Default for TweenController<C> {
    fn default() -> Self {
        Self::new()
    }
}
