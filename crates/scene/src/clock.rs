/// Monotonic elapsed-time source that drives every animated quantity.
///
/// The host owns real time; the clock only accumulates the deltas it is
/// handed. Everything downstream (terrain phase, shader time uniforms)
/// derives from `elapsed`, so a single authority keeps tile motion and
/// material animation in lockstep.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    elapsed: f64,
}

impl FrameClock {
    /// Create a clock at t = 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds accumulated since creation.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advance by `dt` seconds and return the new elapsed time.
    ///
    /// Panics if `dt` is negative or non-finite. The clock is monotonic;
    /// a host that observes time running backwards must clamp before
    /// calling in here.
    pub fn advance(&mut self, dt: f64) -> f64 {
        assert!(
            dt.is_finite() && dt >= 0.0,
            "frame delta must be finite and non-negative, got {dt}"
        );
        self.elapsed += dt;
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_zero() {
        let clock = FrameClock::new();
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn advance_accumulates() {
        let mut clock = FrameClock::new();
        clock.advance(0.016);
        clock.advance(0.016);
        let t = clock.advance(0.008);
        assert!((t - 0.040).abs() < 1e-12);
        assert_eq!(clock.elapsed(), t);
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let mut clock = FrameClock::new();
        clock.advance(1.0);
        clock.advance(0.0);
        assert_eq!(clock.elapsed(), 1.0);
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn negative_delta_panics() {
        let mut clock = FrameClock::new();
        clock.advance(-0.016);
    }

    #[test]
    #[should_panic]
    fn nan_delta_panics() {
        let mut clock = FrameClock::new();
        clock.advance(f64::NAN);
    }
}
