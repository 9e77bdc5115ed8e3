use rand::Rng;
use std::time::Duration;

pub const DEFAULT_MIN_SLEEP: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_SLEEP: Duration = Duration::from_secs(60);

/// Uniform random delay between iterations, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterSchedule {
    min: Duration,
    max: Duration,
}

impl JitterSchedule {
    pub fn new(min: Duration, max: Duration) -> anyhow::Result<Self> {
        // delays are drawn in whole milliseconds
        if u64::try_from(max.as_millis()).is_err() {
            return Err(anyhow::anyhow!(
                "maximum sleep {max:?} does not fit in u64 milliseconds"
            ));
        }
        if min > max {
            return Err(anyhow::anyhow!(
                "minimum sleep {min:?} exceeds maximum sleep {max:?}"
            ));
        }
        Ok(Self { min, max })
    }

    /// No delay at all; used by tests and bounded runs.
    pub fn immediate() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn next_delay(&self) -> Duration {
        self.next_delay_with(&mut rand::thread_rng())
    }

    pub fn next_delay_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let lo = u64::try_from(self.min.as_millis()).unwrap_or(u64::MAX);
        let hi = u64::try_from(self.max.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rng.gen_range(lo..=hi))
    }
}

impl Default for JitterSchedule {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_SLEEP,
            max: DEFAULT_MAX_SLEEP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn delays_stay_in_bounds() {
        let sched = JitterSchedule::default();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..1000 {
            let d = sched.next_delay_with(&mut rng);
            assert!(d >= Duration::from_secs(30) && d <= Duration::from_secs(60), "{d:?}");
        }
    }

    #[test]
    fn equal_bounds_are_fixed() {
        let sched = JitterSchedule::new(Duration::from_secs(5), Duration::from_secs(5)).unwrap();
        assert_eq!(sched.next_delay(), Duration::from_secs(5));
        assert_eq!(JitterSchedule::immediate().next_delay(), Duration::ZERO);
    }

    #[test]
    fn inverted_bounds_rejected() {
        assert!(JitterSchedule::new(Duration::from_secs(2), Duration::from_secs(1)).is_err());
    }

    #[test]
    fn bounds_beyond_millisecond_range_rejected() {
        let min = Duration::from_secs(18_446_744_073_709_551);
        let max = Duration::from_secs(18_446_744_073_709_552);
        assert!(JitterSchedule::new(min, max).is_err());

        let sched = JitterSchedule::new(min, min).unwrap();
        assert_eq!(sched.next_delay(), min);
    }
}
