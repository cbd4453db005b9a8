//=========================================================================
// Time
//=========================================================================
//
// Cooperative time primitives shared by every transition subsystem.
//
// All durations are plain `f32` seconds advanced by the scheduler once per
// tick. Nothing in the core reads the wall clock.
//
//=========================================================================

/// Seconds of presentation time.
pub type Seconds = f32;

/// Tolerance used when comparing accumulated frame time against a deadline.
///
/// Summing `1/60` sixty times does not land exactly on `1.0`, so deadlines
/// are considered reached slightly early.
pub const TIME_EPSILON: Seconds = 1e-4;

/// Linear interpolation between `from` and `to` at `t` (clamped to `[0, 1]`).
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    from + (to - from) * t
}

/// Returns `true` once `now` has reached `deadline` (within [`TIME_EPSILON`]).
pub fn reached(now: Seconds, deadline: Seconds) -> bool {
    now + TIME_EPSILON >= deadline
}

//=== FrameClock ==========================================================

/// Monotonic presentation clock advanced by fixed or variable deltas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameClock {
    now: Seconds,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by `dt` seconds and returns the new time.
    ///
    /// Negative deltas are treated as zero.
    pub fn advance(&mut self, dt: Seconds) -> Seconds {
        self.now += dt.max(0.0);
        self.frames += 1;
        self.now
    }

    pub fn now(&self) -> Seconds {
        self.now
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_clamps_parameter() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, -1.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
        assert_eq!(lerp(1.0, 0.0, 0.25), 0.75);
    }

    #[test]
    fn sixty_frames_reach_one_second() {
        let mut clock = FrameClock::new();
        for _ in 0..60 {
            clock.advance(1.0 / 60.0);
        }
        assert!(reached(clock.now(), 1.0));
        assert_eq!(clock.frames(), 60);
    }

    #[test]
    fn negative_delta_does_not_rewind() {
        let mut clock = FrameClock::new();
        clock.advance(0.5);
        clock.advance(-1.0);
        assert_eq!(clock.now(), 0.5);
    }
}
