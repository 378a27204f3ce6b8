//! Property-based tests for the streaming statistics.
//!
//! The Monte Carlo engine reduces per-block accumulators with
//! `SampleStatistics::merge`; these properties pin down that merging
//! partial results agrees with a single pass over all samples.

use approx::assert_relative_eq;
use pricer_core::math::SampleStatistics;
use proptest::prelude::*;

fn samples() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..500.0, 1..200)
}

proptest! {
    #[test]
    fn merge_matches_single_pass(data in samples(), split in 0usize..200) {
        let split = split.min(data.len());
        let (head, tail) = data.split_at(split);

        let whole: SampleStatistics = data.iter().copied().collect();
        let mut merged: SampleStatistics = head.iter().copied().collect();
        merged.merge(&tail.iter().copied().collect());

        prop_assert_eq!(merged.count(), whole.count());
        assert_relative_eq!(merged.mean(), whole.mean(), epsilon = 1e-9, max_relative = 1e-12);
        assert_relative_eq!(merged.variance(), whole.variance(), epsilon = 1e-7, max_relative = 1e-9);
    }

    #[test]
    fn variance_is_non_negative(data in samples()) {
        let stats: SampleStatistics = data.into_iter().collect();
        prop_assert!(stats.variance() >= 0.0);
        prop_assert!(stats.std_error() <= stats.std_dev());
    }

    #[test]
    fn mean_lies_within_sample_range(data in samples()) {
        let min = data.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let stats: SampleStatistics = data.into_iter().collect();
        prop_assert!(stats.mean() >= min - 1e-9 && stats.mean() <= max + 1e-9);
    }
}
