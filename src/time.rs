//! Frame timing
//!
//! [`Time`] measures the per-frame timestep the scheduler consumes.
//! [`FixedTime`] accumulates variable frame deltas into fixed steps for
//! deterministic update loops.

use std::time::{Duration, Instant};

/// Frame clock producing the per-frame timestep.
#[derive(Clone, Debug)]
pub struct Time {
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
    startup: Instant,
    last_update: Instant,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            startup: now,
            last_update: now,
        }
    }

    /// Advance the clock; call once at the start of each frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now.duration_since(self.last_update);
        self.elapsed = now.duration_since(self.startup);
        self.last_update = now;
        self.frame_count += 1;
    }

    /// Time since the previous frame
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Timestep in seconds, as fed to update phases
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Total time since clock creation
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Frames measured so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-step accumulator for deterministic updates.
#[derive(Clone, Debug)]
pub struct FixedTime {
    timestep: Duration,
    accumulator: Duration,
}

impl FixedTime {
    /// Create with the given step frequency in Hz.
    pub fn new(hz: u32) -> Self {
        Self {
            timestep: Duration::from_secs_f32(1.0 / hz as f32),
            accumulator: Duration::ZERO,
        }
    }

    /// Feed one frame's delta; returns how many fixed steps to run.
    pub fn tick(&mut self, delta: Duration) -> usize {
        self.accumulator += delta;
        let mut steps = 0;
        while self.accumulator >= self.timestep {
            self.accumulator -= self.timestep;
            steps += 1;
        }
        steps
    }

    /// Fixed step duration
    pub fn timestep(&self) -> Duration {
        self.timestep
    }

    /// Leftover time as a fraction of the step, for render interpolation.
    pub fn overstep_fraction(&self) -> f32 {
        self.accumulator.as_secs_f32() / self.timestep.as_secs_f32()
    }
}

impl Default for FixedTime {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_clock() {
        let time = Time::new();
        assert_eq!(time.frame_count(), 0);
        assert_eq!(time.delta(), Duration::ZERO);
    }

    #[test]
    fn test_update_advances_frame_count() {
        let mut time = Time::new();
        time.update();
        time.update();
        assert_eq!(time.frame_count(), 2);
    }

    #[test]
    fn test_fixed_steps_accumulate() {
        let mut fixed = FixedTime::new(60);

        assert_eq!(fixed.tick(Duration::from_millis(10)), 0);
        assert_eq!(fixed.tick(Duration::from_millis(10)), 1);

        // A long frame produces multiple steps.
        assert_eq!(fixed.tick(Duration::from_millis(50)), 3);
    }

    #[test]
    fn test_overstep_fraction_in_range() {
        let mut fixed = FixedTime::new(60);
        fixed.tick(Duration::from_millis(8));
        let fraction = fixed.overstep_fraction();
        assert!(fraction > 0.0 && fraction < 1.0);
    }
}
