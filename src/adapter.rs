//! Invocation adapter
//!
//! One call, one synchronous fit. The engine is passed in explicitly and is
//! mutated in place; the adapter keeps no state of its own and does not
//! retry or snapshot earlier results.

use crate::dataset::Dataset;
use crate::engine::{EngineError, MedoidEngine};
use crate::extract::{self, ExtractError, FitResult};
use thiserror::Error;

/// Errors from a fit followed by extraction
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Run the engine's fit on `dataset` under `loss`.
///
/// `loss` is handed over as given; front ends normalize beforehand if they
/// normalize at all. Engine errors are returned unchanged.
pub fn invoke<E: MedoidEngine + ?Sized>(
    engine: &mut E,
    dataset: &Dataset,
    loss: &str,
) -> Result<(), EngineError> {
    tracing::debug!(
        n = dataset.n_points(),
        d = dataset.n_dims(),
        k = engine.config().n_medoids(),
        algorithm = engine.config().algorithm(),
        loss,
        "invoking engine"
    );
    engine.fit(dataset.matrix(), loss)
}

/// [`invoke`] followed by [`extract::extract`]
pub fn fit<E: MedoidEngine + ?Sized>(
    engine: &mut E,
    dataset: &Dataset,
    loss: &str,
) -> Result<FitResult, AdapterError> {
    invoke(engine, dataset, loss)?;
    Ok(extract::extract(engine)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KMedoidsConfig;
    use crate::engine::KMedoids;
    use ndarray::{array, Array2};

    /// Engine double that records calls and returns canned matrices
    #[derive(Default)]
    struct RecordingEngine {
        config: KMedoidsConfig,
        calls: Vec<(usize, String)>,
        result: Option<Array2<f64>>,
    }

    impl MedoidEngine for RecordingEngine {
        fn config(&self) -> &KMedoidsConfig {
            &self.config
        }

        fn config_mut(&mut self) -> &mut KMedoidsConfig {
            &mut self.config
        }

        fn fit(&mut self, data: &Array2<f64>, loss: &str) -> Result<(), EngineError> {
            self.calls.push((data.ncols(), loss.to_string()));
            if loss == "reject" {
                return Err(EngineError::UnsupportedLoss(loss.to_string()));
            }
            Ok(())
        }

        fn medoids_final(&self) -> Array2<f64> {
            self.result.clone().unwrap_or_else(|| Array2::zeros((1, 0)))
        }

        fn medoids_build(&self) -> Array2<f64> {
            Array2::zeros((1, 0))
        }

        fn labels(&self) -> Array2<f64> {
            Array2::zeros((1, 0))
        }

        fn steps(&self) -> usize {
            0
        }
    }

    #[test]
    fn test_invoke_calls_engine_once_with_loss_verbatim() {
        let mut engine = RecordingEngine::default();
        let dataset = Dataset::from_array(array![[1.0, 2.0, 3.0]]);

        invoke(&mut engine, &dataset, "L2").unwrap();
        assert_eq!(engine.calls, vec![(3, "L2".to_string())]);
    }

    #[test]
    fn test_engine_error_passes_through() {
        let mut engine = RecordingEngine::default();
        let dataset = Dataset::from_array(array![[1.0]]);

        let err = invoke(&mut engine, &dataset, "reject").unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedLoss(ref s) if s == "reject"));
    }

    #[test]
    fn test_fit_surfaces_shape_errors() {
        let mut engine = RecordingEngine {
            result: Some(array![[0.0, 1.0], [2.0, 3.0]]),
            ..RecordingEngine::default()
        };
        let dataset = Dataset::from_array(array![[1.0, 2.0]]);

        let err = fit(&mut engine, &dataset, "2").unwrap_err();
        assert!(matches!(
            err,
            AdapterError::Extract(ExtractError::NotAVector { rows: 2, cols: 2 })
        ));
    }

    #[test]
    fn test_fit_ten_points_three_medoids() {
        let dataset = Dataset::from_array(array![
            [0.0, 0.2, 0.1, 5.0, 5.1, 4.9, 10.0, 10.2, 9.9, 10.1],
            [0.0, 0.1, 0.3, 5.0, 4.8, 5.2, 0.0, 0.1, 0.2, 0.3]
        ]);
        let mut engine = KMedoids::default();
        engine.set_n_medoids(3);

        let result = fit(&mut engine, &dataset, "2").unwrap();
        assert_eq!(result.final_medoids.len(), 3);
        assert_eq!(result.build_medoids.len(), 3);
        assert_eq!(result.labels.len(), 10);
        assert!(result.labels.iter().all(|&label| label < 3));

        // Each group of the dataset ends up in its own cluster
        assert_eq!(result.labels[0..3], [result.labels[0]; 3]);
        assert_eq!(result.labels[3..6], [result.labels[3]; 3]);
        assert_eq!(result.labels[6..10], [result.labels[6]; 4]);
        let mut distinct = result.labels.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(distinct, vec![0, 1, 2]);
    }
}
