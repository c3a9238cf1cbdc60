use std::f32::consts::PI;
use std::time::Instant;

/// Time source driving the scene animation.
///
/// Interactive runs measure wall-clock seconds since the first tick.
/// Headless runs advance by a fixed synthetic step per frame so the loop is
/// deterministic. The clock is passed into the update step explicitly; there
/// is no hidden process-wide timer.
#[derive(Debug)]
pub struct FrameClock {
    mode: Mode,
}

#[derive(Debug)]
enum Mode {
    Wall { started: Option<Instant> },
    Fixed { step: f32, elapsed: f32 },
}

impl FrameClock {
    /// Per-frame step used when no real-time presentation paces the loop.
    pub const SYNTHETIC_STEP: f32 = PI * 0.0125;

    /// Clock that reports elapsed wall time, starting at the first tick.
    pub fn wall() -> Self {
        Self {
            mode: Mode::Wall { started: None },
        }
    }

    /// Clock that advances by `step` seconds per tick.
    pub fn fixed(step: f32) -> Self {
        Self {
            mode: Mode::Fixed { step, elapsed: 0.0 },
        }
    }

    /// Advances one frame and returns total elapsed seconds.
    pub fn tick(&mut self) -> f32 {
        match &mut self.mode {
            Mode::Wall { started } => {
                let now = Instant::now();
                let started = *started.get_or_insert(now);
                now.duration_since(started).as_secs_f32()
            }
            Mode::Fixed { step, elapsed } => {
                *elapsed += *step;
                *elapsed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_accumulates_deterministically() {
        let mut clock = FrameClock::fixed(0.25);
        assert_eq!(clock.tick(), 0.25);
        assert_eq!(clock.tick(), 0.5);
        assert_eq!(clock.tick(), 0.75);
    }

    #[test]
    fn wall_clock_starts_at_zero_and_never_rewinds() {
        let mut clock = FrameClock::wall();
        let first = clock.tick();
        assert_eq!(first, 0.0);
        let mut previous = first;
        for _ in 0..3 {
            let t = clock.tick();
            assert!(t >= previous);
            previous = t;
        }
    }
}
