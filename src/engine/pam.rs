use super::{Algorithm, EngineError, MedoidEngine, Metric};
use crate::config::KMedoidsConfig;
use ndarray::Array2;
use std::fs;
use std::path::PathBuf;

// Relative slack before a swap counts as an improvement, so equal-cost
// swaps that differ only by rounding cannot cycle
const IMPROVEMENT_TOLERANCE: f64 = 1e-12;

/// Exact PAM k-medoids engine
///
/// Holds its configuration and the results of the most recent fit. Each fit
/// overwrites the previous results in place.
///
/// # Example
/// ```
/// use banditpam::config::KMedoidsConfig;
/// use banditpam::engine::{KMedoids, MedoidEngine};
/// use ndarray::array;
///
/// let mut engine = KMedoids::new(KMedoidsConfig::default());
/// engine.set_n_medoids(2);
/// engine.fit(&array![[0.0, 1.0, 2.0, 100.0, 101.0, 102.0]], "2")?;
/// assert_eq!(engine.medoids_final(), array![[1.0, 4.0]]);
/// # Ok::<(), banditpam::engine::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct KMedoids {
    config: KMedoidsConfig,
    medoids_build: Vec<usize>,
    medoids_final: Vec<usize>,
    labels: Vec<usize>,
    steps: usize,
}

impl KMedoids {
    pub fn new(config: KMedoidsConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn write_log(
        &self,
        loss: &str,
        n_points: usize,
        build: &[usize],
        medoids: &[usize],
        steps: usize,
    ) -> Result<(), EngineError> {
        let path = PathBuf::from(self.config.log_filename());
        let contents = format!(
            "algorithm: {}\nloss: {}\npoints: {}\nmedoids: {}\nbuild medoids: {}\nfinal medoids: {}\nswap steps: {}\n",
            self.config.algorithm(),
            loss,
            n_points,
            self.config.n_medoids(),
            join(build),
            join(medoids),
            steps,
        );
        fs::write(&path, contents).map_err(|source| EngineError::Log { path, source })
    }
}

impl MedoidEngine for KMedoids {
    fn config(&self) -> &KMedoidsConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut KMedoidsConfig {
        &mut self.config
    }

    fn fit(&mut self, data: &Array2<f64>, loss: &str) -> Result<(), EngineError> {
        let algorithm = Algorithm::from_name(self.config.algorithm())?;
        let metric = Metric::parse(loss)?;

        let n = data.ncols();
        let k = self.config.n_medoids();
        if n == 0 {
            return Err(EngineError::EmptyDataset);
        }
        if k == 0 {
            return Err(EngineError::NoMedoids);
        }
        if k > n {
            return Err(EngineError::TooManyMedoids { k, n });
        }
        if let Some(((dim, point), _)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(EngineError::NonFiniteData { dim, point });
        }

        tracing::debug!(?algorithm, ?metric, k, n, cache = self.config.cache(), "starting fit");

        let distances = Distances::new(data, metric, self.config.cache());
        let build = build_medoids(&distances, k);
        let (medoids, steps) = swap_medoids(&distances, build.clone(), self.config.max_iter());
        let labels: Vec<usize> = nearest_two(&distances, &medoids)
            .into_iter()
            .map(|nearest| nearest.slot)
            .collect();

        tracing::info!(k, n, steps, "fit complete");

        // Results are only committed once the log is on disk
        if self.config.verbosity() > 0 {
            self.write_log(loss, n, &build, &medoids, steps)?;
        }

        self.medoids_build = build;
        self.medoids_final = medoids;
        self.labels = labels;
        self.steps = steps;
        Ok(())
    }

    fn medoids_final(&self) -> Array2<f64> {
        row_matrix(&self.medoids_final)
    }

    fn medoids_build(&self) -> Array2<f64> {
        row_matrix(&self.medoids_build)
    }

    fn labels(&self) -> Array2<f64> {
        row_matrix(&self.labels)
    }

    fn steps(&self) -> usize {
        self.steps
    }
}

/// Pairwise distance lookup, either precomputed or evaluated on demand
enum Distances<'a> {
    Cached(Array2<f64>),
    OnDemand {
        data: &'a Array2<f64>,
        metric: Metric,
    },
}

impl<'a> Distances<'a> {
    fn new(data: &'a Array2<f64>, metric: Metric, cache: bool) -> Self {
        if !cache {
            return Self::OnDemand { data, metric };
        }

        let n = data.ncols();
        let mut table = Array2::zeros((n, n));
        for i in 0..n {
            for j in (i + 1)..n {
                let d = metric.distance(data.column(i), data.column(j));
                table[[i, j]] = d;
                table[[j, i]] = d;
            }
        }
        Self::Cached(table)
    }

    fn n_points(&self) -> usize {
        match self {
            Self::Cached(table) => table.ncols(),
            Self::OnDemand { data, .. } => data.ncols(),
        }
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        match self {
            Self::Cached(table) => table[[i, j]],
            Self::OnDemand { .. } if i == j => 0.0,
            Self::OnDemand { data, metric } => metric.distance(data.column(i), data.column(j)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Nearest {
    slot: usize,
    first: f64,
    second: f64,
}

/// Closest and second closest medoid distance for every point
fn nearest_two(distances: &Distances, medoids: &[usize]) -> Vec<Nearest> {
    (0..distances.n_points())
        .map(|j| {
            let mut nearest = Nearest {
                slot: 0,
                first: f64::INFINITY,
                second: f64::INFINITY,
            };
            for (slot, &m) in medoids.iter().enumerate() {
                let d = distances.get(m, j);
                if d < nearest.first {
                    nearest.second = nearest.first;
                    nearest.first = d;
                    nearest.slot = slot;
                } else if d < nearest.second {
                    nearest.second = d;
                }
            }
            nearest
        })
        .collect()
}

/// Greedy BUILD: add the point that lowers total distance the most, k times
fn build_medoids(distances: &Distances, k: usize) -> Vec<usize> {
    let n = distances.n_points();
    let mut medoids = Vec::with_capacity(k);
    let mut is_medoid = vec![false; n];
    let mut closest = vec![f64::INFINITY; n];

    for _ in 0..k {
        let mut best: Option<(usize, f64)> = None;
        for candidate in (0..n).filter(|&c| !is_medoid[c]) {
            let total: f64 = closest
                .iter()
                .enumerate()
                .map(|(j, &d)| d.min(distances.get(candidate, j)))
                .sum();
            if best.map_or(true, |(_, best_total)| total < best_total) {
                best = Some((candidate, total));
            }
        }

        let Some((chosen, _)) = best else { break };
        medoids.push(chosen);
        is_medoid[chosen] = true;
        for (j, d) in closest.iter_mut().enumerate() {
            *d = d.min(distances.get(chosen, j));
        }
    }
    medoids
}

/// Best-improvement SWAP until no swap lowers the loss or `max_iter` is hit
fn swap_medoids(
    distances: &Distances,
    mut medoids: Vec<usize>,
    max_iter: usize,
) -> (Vec<usize>, usize) {
    let n = distances.n_points();
    let mut steps = 0;

    while steps < max_iter {
        let nearest = nearest_two(distances, &medoids);
        let current: f64 = nearest.iter().map(|p| p.first).sum();

        let mut is_medoid = vec![false; n];
        for &m in &medoids {
            is_medoid[m] = true;
        }

        let mut best: Option<(usize, usize, f64)> = None;
        for slot in 0..medoids.len() {
            for candidate in (0..n).filter(|&c| !is_medoid[c]) {
                let total: f64 = nearest
                    .iter()
                    .enumerate()
                    .map(|(j, p)| {
                        let to_candidate = distances.get(candidate, j);
                        let without_slot = if p.slot == slot { p.second } else { p.first };
                        without_slot.min(to_candidate)
                    })
                    .sum();
                if best.map_or(true, |(_, _, best_total)| total < best_total) {
                    best = Some((slot, candidate, total));
                }
            }
        }

        match best {
            Some((slot, candidate, total))
                if current - total > IMPROVEMENT_TOLERANCE * current.max(1.0) =>
            {
                tracing::trace!(slot, from = medoids[slot], to = candidate, total, "swap");
                medoids[slot] = candidate;
                steps += 1;
            }
            _ => break,
        }
    }
    (medoids, steps)
}

fn row_matrix(values: &[usize]) -> Array2<f64> {
    Array2::from_shape_fn((1, values.len()), |(_, i)| values[i] as f64)
}

fn join(values: &[usize]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
