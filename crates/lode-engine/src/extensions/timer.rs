// extensions/timer.rs
//
// Named countdown timers that call back into a caller-supplied context.
//
// Usage:
//   let mut timers = TimerController::<MyGame>::new();
//   timers.create("spawn", 2.0, true, |game| game.spawn_wave());
//   timers.tick(dt, &mut game);

use crate::api::types::ScheduleId;
use crate::core::time::reached;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Running,
    Paused,
    Finished,
}

pub struct Timer<C> {
    pub id: ScheduleId,
    pub name: String,
    /// Seconds between firings.
    pub interval: f32,
    pub elapsed: f32,
    pub looping: bool,
    pub state: TimerState,
    callback: Box<dyn FnMut(&mut C)>,
}

impl<C> Timer<C> {
    /// Fire at most once per tick. Overshoot is dropped.
    fn tick(&mut self, dt: f32, ctx: &mut C) {
        if self.state != TimerState::Running {
            return;
        }
        self.elapsed += dt;
        if reached(self.elapsed, self.interval) {
            self.elapsed = 0.0;
            if !self.looping {
                self.state = TimerState::Finished;
            }
            (self.callback)(ctx);
        }
    }
}

pub struct TimerController<C> {
    timers: Vec<Timer<C>>,
    next_id: u32,
}

impl<C> TimerController<C> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 0,
        }
    }

    /// Start a running timer. Names need not be unique; lookups return the oldest match.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        interval: f32,
        looping: bool,
        callback: impl FnMut(&mut C) + 'static,
    ) -> ScheduleId {
        let id = ScheduleId(self.next_id);
        self.next_id += 1;
        let name = name.into();
        log::debug!("timer {:?} '{}' every {}s (looping: {})", id, name, interval, looping);
        self.timers.push(Timer {
            id,
            name,
            interval,
            elapsed: 0.0,
            looping,
            state: TimerState::Running,
            callback: Box::new(callback),
        });
        id
    }

    /// Advance every running timer, then drop the finished ones.
    pub fn tick(&mut self, dt: f32, ctx: &mut C) {
        for timer in &mut self.timers {
            timer.tick(dt, ctx);
        }
        let before = self.timers.len();
        self.timers.retain(|t| t.state != TimerState::Finished);
        let pruned = before - self.timers.len();
        if pruned > 0 {
            log::debug!("pruned {} finished timer(s)", pruned);
        }
    }

    pub fn get(&self, id: ScheduleId) -> Option<&Timer<C>> {
        self.timers.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: ScheduleId) -> Option<&mut Timer<C>> {
        self.timers.iter_mut().find(|t| t.id == id)
    }

    pub fn find(&self, name: &str) -> Option<&Timer<C>> {
        self.timers.iter().find(|t| t.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Timer<C>> {
        self.timers.iter_mut().find(|t| t.name == name)
    }

    pub fn pause(&mut self, id: ScheduleId) -> bool {
        self.set_state(id, TimerState::Paused)
    }

    pub fn resume(&mut self, id: ScheduleId) -> bool {
        self.set_state(id, TimerState::Running)
    }

    /// Mark finished; removed on the next tick.
    pub fn kill(&mut self, id: ScheduleId) -> bool {
        self.set_state(id, TimerState::Finished)
    }

    /// Restart the countdown without touching the state.
    pub fn reset(&mut self, id: ScheduleId) -> bool {
        match self.get_mut(id) {
            Some(timer) => {
                timer.elapsed = 0.0;
                true
            }
            None => false,
        }
    }

    fn set_state(&mut self, id: ScheduleId, state: TimerState) -> bool {
        match self.get_mut(id) {
            Some(timer) if timer.state != TimerState::Finished => {
                timer.state = state;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

impl<C> Default for TimerController<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        fired: u32,
    }

    #[test]
    fn one_shot_fires_once_and_is_pruned() {
        let mut timers = TimerController::<Counter>::new();
        let mut ctx = Counter::default();
        timers.create("once", 1.0, false, |c| c.fired += 1);

        timers.tick(0.6, &mut ctx);
        assert_eq!(ctx.fired, 0);
        timers.tick(0.6, &mut ctx);
        assert_eq!(ctx.fired, 1);
        assert!(timers.is_empty());
    }

    #[test]
    fn looping_timer_restarts_from_zero() {
        let mut timers = TimerController::<Counter>::new();
        let mut ctx = Counter::default();
        let id = timers.create("loop", 0.5, true, |c| c.fired += 1);

        // Overshoot is dropped, so a 0.7s tick still needs a full interval for the next fire.
        timers.tick(0.7, &mut ctx);
        assert_eq!(timers.get(id).unwrap().elapsed, 0.0);
        timers.tick(0.4, &mut ctx);
        assert_eq!(ctx.fired, 1);
        timers.tick(0.2, &mut ctx);
        assert_eq!(ctx.fired, 2);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn paused_timer_does_not_advance() {
        let mut timers = TimerController::<Counter>::new();
        let mut ctx = Counter::default();
        let id = timers.create("p", 1.0, false, |c| c.fired += 1);

        assert!(timers.pause(id));
        timers.tick(5.0, &mut ctx);
        assert_eq!(ctx.fired, 0);
        assert_eq!(timers.find("p").unwrap().state, TimerState::Paused);

        assert!(timers.resume(id));
        timers.tick(1.0, &mut ctx);
        assert_eq!(ctx.fired, 1);
    }

    #[test]
    fn reset_restarts_countdown() {
        let mut timers = TimerController::<Counter>::new();
        let mut ctx = Counter::default();
        let id = timers.create("r", 1.0, false, |c| c.fired += 1);
        timers.tick(0.9, &mut ctx);
        assert!(timers.reset(id));
        timers.tick(0.9, &mut ctx);
        assert_eq!(ctx.fired, 0);
    }

    #[test]
    fn kill_removes_without_firing() {
        let mut timers = TimerController::<Counter>::new();
        let mut ctx = Counter::default();
        let id = timers.create("k", 0.1, true, |c| c.fired += 1);
        assert!(timers.kill(id));
        assert!(!timers.resume(id));
        timers.tick(1.0, &mut ctx);
        assert_eq!(ctx.fired, 0);
        assert!(timers.get(id).is_none());
        assert!(!timers.kill(id));
    }

    #[test]
    fn whole_second_fires_on_sixtieth_step() {
        #[derive(Default)]
        struct Ticks {
            now: u32,
            fired_at: Vec<u32>,
        }

        let mut timers = TimerController::<Ticks>::new();
        let mut ctx = Ticks::default();
        timers.create("second", 1.0, true, |t: &mut Ticks| t.fired_at.push(t.now));

        for step in 1..=180 {
            ctx.now = step;
            timers.tick(1.0 / 60.0, &mut ctx);
        }
        assert_eq!(ctx.fired_at, vec![60, 120, 180]);
    }
}
