//! Property-based tests: the distributed transform agrees with the serial
//! reference for random signals and rank counts.

use std::time::Duration;

use proptest::prelude::*;

use pfft_core::reference::reference_transform;
use pfft_core::{RemainderPolicy, RunOptions};
use pfft_engine::execute;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn distributed_matches_reference(
        k in 0u32..7,
        ranks in 2usize..9,
        seed in prop::collection::vec(-50f64..50.0, 64),
    ) {
        let samples = &seed[..1 << k];
        let opts = RunOptions {
            ranks,
            sync_timeout: Duration::from_secs(10),
            ..Default::default()
        };
        let result = execute(samples, &opts).unwrap();
        let expected = reference_transform(samples).unwrap();
        let scale = samples.iter().map(|x| x.abs()).sum::<f64>().max(1.0);
        prop_assert!(result.spectrum.max_deviation(&expected) / scale < 1e-9);
        prop_assert_eq!(result.stages, k);
    }

    #[test]
    fn strict_policy_agrees_when_even(k in 2u32..7, values in prop::collection::vec(-5f64..5.0, 64)) {
        let samples = &values[..1 << k];
        // Four workers divide every power of two from 4 upwards.
        let strict = RunOptions {
            ranks: 5,
            remainder: RemainderPolicy::Strict,
            ..Default::default()
        };
        let spread = RunOptions { ranks: 5, ..Default::default() };
        let a = execute(samples, &strict).unwrap().spectrum;
        let b = execute(samples, &spread).unwrap().spectrum;
        prop_assert!(a.max_deviation(&b) < 1e-12);
    }
}
