//! Exponential backoff with jitter between page fetch attempts.

use rand::Rng;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Duration,
    jitter_ratio: f64,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        let base = base.max(Duration::from_millis(1));
        let max = max.max(base);
        Self {
            base,
            max,
            current: base,
            jitter_ratio: 0.2,
        }
    }

    pub fn reset(&mut self) {
        self.current = self.base;
    }

    /// Record a failure and return how long to wait before the next attempt.
    ///
    /// The first failure waits `base`; later ones double up to `max`.
    pub fn fail(&mut self) -> Duration {
        let delay = add_jitter(self.current, self.jitter_ratio);
        self.current = self.current.saturating_mul(2).min(self.max);
        delay
    }
}

fn add_jitter(delay: Duration, ratio: f64) -> Duration {
    if !(0.0..=1.0).contains(&ratio) {
        return delay;
    }

    let jitter_ms_max = ((delay.as_millis() as f64) * ratio) as u64;
    if jitter_ms_max == 0 {
        return delay;
    }

    let jitter_ms = rand::rng().random_range(0..=jitter_ms_max);
    delay + Duration::from_millis(jitter_ms)
}

/// Uniformly random delay in `[min, max]`.
pub fn politeness_delay(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let secs = rand::rng().random_range(min.as_secs_f64()..=max.as_secs_f64());
    Duration::from_secs_f64(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_failure_waits_base() {
        let mut backoff = Backoff::new(Duration::from_millis(100), Duration::from_secs(1));
        let delay = backoff.fail();
        assert!(delay >= Duration::from_millis(100));
        assert!(delay <= Duration::from_millis(120));
    }

    #[test]
    fn failures_double_until_max() {
        let mut backoff = Backoff::new(Duration::from_millis(10), Duration::from_millis(20));

        let _ = backoff.fail();
        let delay2 = backoff.fail();
        assert!(delay2 >= Duration::from_millis(20));
        assert!(delay2 <= Duration::from_millis(24));

        let delay3 = backoff.fail();
        assert!(delay3 <= Duration::from_millis(24));
    }

    #[test]
    fn reset_returns_to_base() {
        let mut backoff = Backoff::new(Duration::from_millis(50), Duration::from_secs(5));
        backoff.fail();
        backoff.fail();
        backoff.reset();
        assert!(backoff.fail() <= Duration::from_millis(60));
    }

    #[test]
    fn politeness_delay_stays_in_window() {
        let min = Duration::from_secs(5);
        let max = Duration::from_secs(10);
        for _ in 0..50 {
            let delay = politeness_delay(min, max);
            assert!(delay >= min && delay <= max, "got {delay:?}");
        }
        assert_eq!(politeness_delay(Duration::ZERO, Duration::ZERO), Duration::ZERO);
    }
}
