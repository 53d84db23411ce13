/// Fixed timestep accumulator.
/// Turns variable host frame times into a whole number of logic ticks.
pub struct FixedTimestep {
    /// The fixed delta time per tick, in seconds.
    dt: f32,
    /// Most ticks a single frame may run before the backlog is dropped.
    max_steps: u32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self::with_max_steps(dt, 10)
    }

    pub fn with_max_steps(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if self.dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt.max(0.0);
        // A long stall (debugger, window drag) must not replay seconds of logic.
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Drop any partial tick, e.g. after a scene change.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Relative slack when comparing summed `f32` step times against a duration.
const TIME_TOLERANCE: f32 = 1e-5;

/// True once `elapsed` has covered `duration`. Sixty steps of `1/60` sum to
/// slightly under one second in `f32`, which still counts as a full second.
#[inline]
pub fn reached(elapsed: f32, duration: f32) -> bool {
    elapsed >= duration - duration.abs() * TIME_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0 / 60.0);
        assert_eq!(steps, 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn caps_at_configured_steps() {
        let mut ts = FixedTimestep::with_max_steps(1.0 / 60.0, 4);
        assert_eq!(ts.accumulate(1.0), 4);
    }

    #[test]
    fn negative_frame_time_is_ignored() {
        let mut ts = FixedTimestep::new(0.1);
        assert_eq!(ts.accumulate(-5.0), 0);
        assert_eq!(ts.accumulate(0.1), 1);
    }

    #[test]
    fn reset_discards_partial_tick() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        ts.accumulate(0.01);
        ts.reset();
        assert_eq!(ts.alpha(), 0.0);
    }

    #[test]
    fn sixty_steps_reach_one_second() {
        let dt = 1.0_f32 / 60.0;
        let mut elapsed = 0.0_f32;
        for _ in 0..59 {
            elapsed += dt;
        }
        assert!(!reached(elapsed, 1.0));
        elapsed += dt;
        assert!(reached(elapsed, 1.0));
        assert!(reached(0.0, 0.0));
    }
}
