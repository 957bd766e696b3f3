//! Property-based tests for the adapter layer
//!
//! Core properties covered:
//! 1. Command-line loss normalization strips exactly one leading `L`
//! 2. Configuration properties round-trip through their setters
//! 3. Squeeze preserves order and length, and rejects non-vectors
//! 4. Fits produce one label per point and k medoids

use banditpam::adapter;
use banditpam::config::KMedoidsConfig;
use banditpam::dataset::Dataset;
use banditpam::engine::{KMedoids, MedoidEngine};
use banditpam::extract::{squeeze, ExtractError};
use banditpam::loss::normalize_cli_loss;
use ndarray::Array2;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_l_prefix_stripped_once(digits in "[0-9]{1,4}") {
        let prefixed = format!("L{}", digits);
        prop_assert_eq!(normalize_cli_loss(&prefixed), digits.as_str());
    }

    #[test]
    fn prop_unprefixed_loss_unchanged(loss in "[^L].*") {
        prop_assert_eq!(normalize_cli_loss(&loss), loss.as_str());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_config_round_trip(
        n_medoids in any::<usize>(),
        algorithm in ".*",
        verbosity in any::<u32>(),
        max_iter in any::<usize>(),
        log_filename in ".*",
        cache in any::<bool>(),
    ) {
        let mut config = KMedoidsConfig::default();
        config.set_n_medoids(n_medoids);
        config.set_algorithm(algorithm.as_str());
        config.set_verbosity(verbosity);
        config.set_max_iter(max_iter);
        config.set_log_filename(log_filename.as_str());
        config.set_cache(cache);

        prop_assert_eq!(config.n_medoids(), n_medoids);
        prop_assert_eq!(config.algorithm(), algorithm.as_str());
        prop_assert_eq!(config.verbosity(), verbosity);
        prop_assert_eq!(config.max_iter(), max_iter);
        prop_assert_eq!(config.log_filename(), log_filename.as_str());
        prop_assert_eq!(config.cache(), cache);
    }

    #[test]
    fn prop_config_toml_round_trip(
        n_medoids in 1usize..1000,
        verbosity in 0u32..5,
        max_iter in 1usize..10_000,
        cache in any::<bool>(),
    ) {
        let config = KMedoidsConfig::new(n_medoids, "naive", verbosity, max_iter, "fit.log", cache);
        let text = toml::to_string(&config).unwrap();
        let parsed: KMedoidsConfig = toml::from_str(&text).unwrap();
        prop_assert_eq!(parsed, config);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_squeeze_row_keeps_order(values in prop::collection::vec(-1e6f64..1e6, 0..50)) {
        let row = Array2::from_shape_vec((1, values.len()), values.clone()).unwrap();
        prop_assert_eq!(squeeze(&row).unwrap(), values.clone());

        let column = Array2::from_shape_vec((values.len(), 1), values.clone()).unwrap();
        prop_assert_eq!(squeeze(&column).unwrap(), values);
    }

    #[test]
    fn prop_squeeze_rejects_matrices(rows in 2usize..6, cols in 2usize..6) {
        let matrix = Array2::<f64>::zeros((rows, cols));
        prop_assert_eq!(squeeze(&matrix), Err(ExtractError::NotAVector { rows, cols }));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn prop_fit_shapes(
        (n, values) in (3usize..15).prop_flat_map(|n| (Just(n), prop::collection::vec(-100f64..100.0, 2 * n))),
        k in 1usize..4,
    ) {
        let matrix = Array2::from_shape_vec((2, n), values).unwrap();
        let mut engine = KMedoids::default();
        engine.set_n_medoids(k);

        let result = adapter::fit(&mut engine, &Dataset::from_array(matrix), "2").unwrap();
        prop_assert_eq!(result.final_medoids.len(), k);
        prop_assert_eq!(result.build_medoids.len(), k);
        prop_assert_eq!(result.labels.len(), n);
        prop_assert!(result.labels.iter().all(|&label| label < k));
        prop_assert!(result.final_medoids.iter().all(|&m| m < n));

        // Every medoid is labelled with its own cluster
        for (slot, &medoid) in result.final_medoids.iter().enumerate() {
            prop_assert_eq!(result.labels[medoid], slot);
        }
    }
}
