//! Simulation timing.
//!
//! Provides a fixed timestep accumulator for combat ticks and a wall clock
//! used to pace realtime runs.

use std::time::{Duration, Instant};

/// Largest frame delta accepted, in seconds (prevents spiral of death).
pub const MAX_FRAME_DT: f32 = 0.25;

/// Maximum fixed steps produced by one frame.
const MAX_STEPS_PER_FRAME: u32 = 10;

/// Converts variable frame deltas into whole fixed steps.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// Fixed step length in seconds
    fixed_dt: f32,
    /// Time not yet consumed by a step
    accumulator: f32,
}

impl FixedTimestep {
    /// Create a timestep running at `tick_rate` Hz.
    #[must_use]
    pub fn new(tick_rate: u32) -> Self {
        Self {
            fixed_dt: 1.0 / tick_rate.max(1) as f32,
            accumulator: 0.0,
        }
    }

    /// Fixed step length in seconds.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Time carried over to the next frame.
    #[must_use]
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Accumulate a frame delta.
    /// Returns the number of fixed steps that should be performed.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.accumulator += dt;

        let mut count = 0;
        while self.accumulator >= self.fixed_dt && count < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.fixed_dt;
            count += 1;
        }

        // Still behind: drop the backlog
        if self.accumulator > self.fixed_dt * 2.0 {
            self.accumulator = 0.0;
        }

        count
    }
}

/// Wall clock for realtime runs.
#[derive(Debug)]
pub struct FrameClock {
    /// Time of last frame start
    last_frame: Instant,
    /// Time budget per frame
    frame_budget: Duration,
}

impl FrameClock {
    /// Create a clock targeting `fps` frames per second.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        Self {
            last_frame: Instant::now(),
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
        }
    }

    /// Seconds since the last call, clamped to [`MAX_FRAME_DT`].
    pub fn delta_time(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt.min(MAX_FRAME_DT)
    }

    /// Sleep for whatever is left of the frame budget.
    pub fn sleep_remainder(&self) {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_timestep_creation() {
        let timestep = FixedTimestep::new(20);
        assert!((timestep.fixed_dt() - 0.05).abs() < 1e-6);
        assert!(timestep.accumulator().abs() < f32::EPSILON);
    }

    #[test]
    fn test_accumulate_whole_steps() {
        let mut timestep = FixedTimestep::new(10);
        assert_eq!(timestep.accumulate(0.05), 0);
        assert_eq!(timestep.accumulate(0.06), 1);
        assert!((timestep.accumulator() - 0.01).abs() < 1e-4);
        assert_eq!(timestep.accumulate(0.2), 2);
    }

    #[test]
    fn test_huge_delta_is_clamped() {
        let mut timestep = FixedTimestep::new(10);
        assert_eq!(timestep.accumulate(10.0), 2);
        assert!(timestep.accumulator() < timestep.fixed_dt());
    }

    #[test]
    fn test_invalid_delta_ignored() {
        let mut timestep = FixedTimestep::new(10);
        assert_eq!(timestep.accumulate(-1.0), 0);
        assert_eq!(timestep.accumulate(f32::NAN), 0);
        assert!(timestep.accumulator().abs() < f32::EPSILON);
    }

    #[test]
    fn test_step_cap_drops_backlog() {
        let mut timestep = FixedTimestep::new(240);
        assert_eq!(timestep.accumulate(0.25), MAX_STEPS_PER_FRAME);
        assert!(timestep.accumulator().abs() < f32::EPSILON);
    }

    #[test]
    fn test_frame_clock_delta() {
        let mut clock = FrameClock::new(60);
        std::thread::sleep(Duration::from_millis(5));
        let dt = clock.delta_time();
        assert!(dt >= 0.004);
        assert!(dt <= MAX_FRAME_DT);
    }
}
