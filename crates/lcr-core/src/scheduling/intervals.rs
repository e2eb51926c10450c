//! Interval generation with per-interval randomization.
//!
//! Produces day-offsets from a reference date. Offsets are absolute with
//! respect to that date, not cumulative from the previous review.

use rand::Rng;

use crate::error::{ErrorCode, LcrError, LcrResult};

/// Default base intervals in days.
pub const DEFAULT_INTERVALS: [u32; 4] = [1, 7, 18, 35];
/// Default randomization factor (±15%).
pub const DEFAULT_RANDOMIZATION: f64 = 0.15;
/// Default ceiling for a single interval.
pub const DEFAULT_MAX_INTERVAL: u32 = 365;
/// Most reviews a single planning call may generate.
pub const MAX_REVIEW_COUNT: u32 = 100;

/// Scheduler producing concrete review offsets from base intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalScheduler {
    base_intervals: Vec<u32>,
    randomization: f64,
    max_interval: u32,
}

impl IntervalScheduler {
    /// Create a scheduler, validating intervals and randomization factor.
    pub fn new(base_intervals: Vec<u32>, randomization: f64) -> LcrResult<Self> {
        validate_base(&base_intervals)?;
        validate_randomization(randomization)?;
        Ok(Self {
            base_intervals,
            randomization,
            max_interval: DEFAULT_MAX_INTERVAL,
        })
    }

    /// Set the ceiling applied to every generated interval.
    pub fn with_max_interval(mut self, max_interval: u32) -> LcrResult<Self> {
        if max_interval < 1 {
            return Err(LcrError::validation_code(
                ErrorCode::ValInvalidIntervals,
                "max_interval must be at least 1",
            ));
        }
        self.max_interval = max_interval;
        Ok(self)
    }

    pub fn base_intervals(&self) -> &[u32] {
        &self.base_intervals
    }

    pub fn randomization(&self) -> f64 {
        self.randomization
    }

    pub fn max_interval(&self) -> u32 {
        self.max_interval
    }

    /// Generate `count` offsets using the thread-local RNG.
    pub fn generate(&self, count: u32) -> LcrResult<Vec<u32>> {
        let mut rng = rand::thread_rng();
        self.generate_with_rng(count, &mut rng)
    }

    /// Generate `count` offsets with a provided RNG.
    ///
    /// Useful for reproducible testing.
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, count: u32, rng: &mut R) -> LcrResult<Vec<u32>> {
        let offsets = generate_intervals(&self.base_intervals, count, self.randomization, rng)?;
        Ok(offsets
            .into_iter()
            .map(|offset| offset.min(self.max_interval))
            .collect())
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self {
            base_intervals: DEFAULT_INTERVALS.to_vec(),
            randomization: DEFAULT_RANDOMIZATION,
            max_interval: DEFAULT_MAX_INTERVAL,
        }
    }
}

/// Generate `count` day-offsets from `base_intervals`.
///
/// Entries past the end of `base_intervals` repeat its last value. Each raw
/// interval `I` becomes `round(I * (1 + u))` with `u` drawn uniformly from
/// `[-randomization, +randomization]` per interval, floored at 1. With
/// `randomization == 0` the RNG is never touched and the base values are
/// returned unchanged.
pub fn generate_intervals<R: Rng + ?Sized>(
    base_intervals: &[u32],
    count: u32,
    randomization: f64,
    rng: &mut R,
) -> LcrResult<Vec<u32>> {
    if !(1..=MAX_REVIEW_COUNT).contains(&count) {
        return Err(LcrError::validation_with_suggestion(
            ErrorCode::ValInvalidCount,
            format!("review count must be between 1 and {}, got {}", MAX_REVIEW_COUNT, count),
            format!("Plan at most {} reviews at a time", MAX_REVIEW_COUNT),
        ));
    }
    validate_base(base_intervals)?;
    validate_randomization(randomization)?;

    let last = base_intervals[base_intervals.len() - 1];
    let intervals = (0..count as usize)
        .map(|i| {
            let raw = base_intervals.get(i).copied().unwrap_or(last);
            randomize(raw, randomization, rng)
        })
        .collect();

    Ok(intervals)
}

fn randomize<R: Rng + ?Sized>(raw: u32, randomization: f64, rng: &mut R) -> u32 {
    if randomization == 0.0 {
        return raw.max(1);
    }
    let u: f64 = rng.gen_range(-randomization..=randomization);
    let value = (f64::from(raw) * (1.0 + u)).round();
    if value < 1.0 {
        1
    } else {
        value as u32
    }
}

fn validate_base(base_intervals: &[u32]) -> LcrResult<()> {
    if base_intervals.is_empty() {
        return Err(LcrError::validation_code(
            ErrorCode::ValInvalidIntervals,
            "base intervals cannot be empty",
        ));
    }
    if base_intervals.iter().any(|&i| i == 0) {
        return Err(LcrError::validation_code(
            ErrorCode::ValInvalidIntervals,
            "base intervals must be positive integers",
        ));
    }
    Ok(())
}

fn validate_randomization(randomization: f64) -> LcrResult<()> {
    if !randomization.is_finite() || !(0.0..=1.0).contains(&randomization) {
        return Err(LcrError::validation_with_suggestion(
            ErrorCode::ValInvalidRandomization,
            format!("randomization must be between 0 and 1, got {}", randomization),
            "Use a fraction such as 0.15 for ±15%",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_zero_randomization_returns_base() {
        let mut rng = seeded_rng();
        let out = generate_intervals(&[1, 7, 18, 35], 4, 0.0, &mut rng).unwrap();
        assert_eq!(out, vec![1, 7, 18, 35]);
    }

    #[test]
    fn test_truncates_to_count() {
        let mut rng = seeded_rng();
        let out = generate_intervals(&[1, 7, 18, 35], 2, 0.0, &mut rng).unwrap();
        assert_eq!(out, vec![1, 7]);
    }

    #[test]
    fn test_repeats_last_interval() {
        let mut rng = seeded_rng();
        let out = generate_intervals(&[1, 7, 18, 35], 7, 0.0, &mut rng).unwrap();
        assert_eq!(out, vec![1, 7, 18, 35, 35, 35, 35]);
    }

    #[test]
    fn test_randomized_within_bounds_and_floored() {
        let mut rng = seeded_rng();
        for _ in 0..200 {
            let out = generate_intervals(&[1, 7, 18, 35], 6, 1.0, &mut rng).unwrap();
            assert_eq!(out.len(), 6);
            assert!(out.iter().all(|&i| i >= 1), "floor violated: {:?}", out);
            // I * (1 + u) with u in [-1, 1] stays within [0, 2I]
            assert!(out[3] <= 70);
        }
    }

    #[test]
    fn test_randomization_spread() {
        let mut rng = seeded_rng();
        let samples: Vec<u32> = (0..1000)
            .map(|_| generate_intervals(&[100], 1, 0.15, &mut rng).unwrap()[0])
            .collect();

        assert!(samples.iter().all(|&s| (85..=115).contains(&s)));
        let mean = samples.iter().map(|&s| f64::from(s)).sum::<f64>() / samples.len() as f64;
        assert!((mean - 100.0).abs() < 2.0, "mean {} should be close to 100", mean);
        // draws are independent, so not every sample is identical
        assert!(samples.iter().any(|&s| s != samples[0]));
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let a = generate_intervals(&[1, 7, 18, 35], 4, 0.15, &mut seeded_rng()).unwrap();
        let b = generate_intervals(&[1, 7, 18, 35], 4, 0.15, &mut seeded_rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let mut rng = seeded_rng();
        let err = generate_intervals(&[1, 7], 0, 0.0, &mut rng).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValInvalidCount);

        let err = generate_intervals(&[], 3, 0.0, &mut rng).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValInvalidIntervals);

        let err = generate_intervals(&[1, 0], 3, 0.0, &mut rng).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValInvalidIntervals);

        let err = generate_intervals(&[1], 1, 1.5, &mut rng).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValInvalidRandomization);

        let err = generate_intervals(&[1], 1, -0.1, &mut rng).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValInvalidRandomization);

        assert!(generate_intervals(&[1], 1, f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn test_count_is_capped() {
        let mut rng = seeded_rng();
        let out = generate_intervals(&[1, 7], MAX_REVIEW_COUNT, 0.0, &mut rng).unwrap();
        assert_eq!(out.len(), MAX_REVIEW_COUNT as usize);

        let err = generate_intervals(&[1, 7], MAX_REVIEW_COUNT + 1, 0.0, &mut rng).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValInvalidCount);
        assert!(err.suggestion().is_some());

        let err = IntervalScheduler::default().generate_with_rng(u32::MAX, &mut rng).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValInvalidCount);
    }

    #[test]
    fn test_scheduler_applies_max_interval() {
        let scheduler = IntervalScheduler::new(vec![10, 400], 0.0)
            .unwrap()
            .with_max_interval(365)
            .unwrap();
        let out = scheduler.generate_with_rng(3, &mut seeded_rng()).unwrap();
        assert_eq!(out, vec![10, 365, 365]);
    }

    #[test]
    fn test_scheduler_defaults() {
        let scheduler = IntervalScheduler::default();
        assert_eq!(scheduler.base_intervals(), &DEFAULT_INTERVALS);
        assert_eq!(scheduler.randomization(), DEFAULT_RANDOMIZATION);
        assert!(IntervalScheduler::new(vec![], 0.1).is_err());
        assert!(IntervalScheduler::new(vec![1], 0.1).unwrap().with_max_interval(0).is_err());
    }
}
