//! Fixed-interval frame pacing
//!
//! The refresh signal (`requestAnimationFrame`) fires faster than the
//! simulation should run. `FramePacer` lets a step through once at least one
//! interval has elapsed and keeps the leftover time, so the long-run rate
//! holds under jitter.

#[derive(Debug, Clone)]
pub struct FramePacer {
    interval_ms: f64,
    then_ms: f64,
}

impl FramePacer {
    /// Pacer letting one step through every `interval_ms`, counting from `now_ms`
    pub fn new(interval_ms: f64, now_ms: f64) -> Self {
        Self {
            interval_ms,
            then_ms: now_ms,
        }
    }

    /// Returns true when a step is due at `now_ms`
    pub fn poll(&mut self, now_ms: f64) -> bool {
        let delta = now_ms - self.then_ms;
        if delta >= self.interval_ms {
            self.then_ms = now_ms - (delta % self.interval_ms);
            true
        } else {
            false
        }
    }

    /// Restart counting from `now_ms` (after a reset or a long pause)
    pub fn reset(&mut self, now_ms: f64) {
        self.then_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_200hz_refresh_runs_20_steps_per_second() {
        let mut pacer = FramePacer::new(50.0, 0.0);

        // 5 seconds of 200 Hz refresh
        let steps = (1..=1000)
            .filter(|i| pacer.poll(*i as f64 * 5.0))
            .count();
        assert!((99..=101).contains(&steps), "got {} steps", steps);
    }

    #[test]
    fn test_remainder_carries_over() {
        let mut pacer = FramePacer::new(50.0, 0.0);
        assert!(!pacer.poll(30.0));
        // 70ms elapsed: 20ms carried
        assert!(pacer.poll(70.0));
        // Only 30ms since the last poll, but 50ms since the carried origin
        assert!(pacer.poll(100.0));
        assert!(!pacer.poll(120.0));
    }

    #[test]
    fn test_jittered_refresh_keeps_average() {
        let mut pacer = FramePacer::new(50.0, 0.0);
        let mut now = 0.0;
        let mut steps = 0;
        // Alternate 3ms and 13ms frames (8ms average) for 10 seconds
        for i in 0..1250 {
            now += if i % 2 == 0 { 3.0 } else { 13.0 };
            if pacer.poll(now) {
                steps += 1;
            }
        }
        assert!((195..=200).contains(&steps), "got {} steps", steps);
    }

    #[test]
    fn test_reset() {
        let mut pacer = FramePacer::new(100.0, 0.0);
        pacer.reset(1000.0);
        assert!(!pacer.poll(1050.0));
        assert!(pacer.poll(1100.0));
    }
}
