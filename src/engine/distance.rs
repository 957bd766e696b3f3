use super::EngineError;
use ndarray::ArrayView1;

/// Dissimilarity between two points, selected by a loss specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Lp norm of the difference, `p >= 1`
    Minkowski(u32),
    /// L-infinity norm of the difference
    Chebyshev,
    /// One minus cosine similarity
    Cosine,
}

impl Metric {
    /// Parse a loss specifier.
    ///
    /// Accepts an optional single `L`/`l` prefix followed by a positive
    /// integer order, `inf`, `cos` or `manhattan`.
    pub fn parse(loss: &str) -> Result<Self, EngineError> {
        let body = loss
            .strip_prefix('L')
            .or_else(|| loss.strip_prefix('l'))
            .unwrap_or(loss);

        match body.to_ascii_lowercase().as_str() {
            "inf" => return Ok(Self::Chebyshev),
            "cos" => return Ok(Self::Cosine),
            "manhattan" => return Ok(Self::Minkowski(1)),
            _ => {}
        }

        match body.parse::<u32>() {
            Ok(p) if p >= 1 => Ok(Self::Minkowski(p)),
            _ => Err(EngineError::UnsupportedLoss(loss.to_string())),
        }
    }

    pub fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        match *self {
            Self::Minkowski(1) => a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum(),
            Self::Minkowski(2) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f64>()
                .sqrt(),
            Self::Minkowski(p) => {
                let p = f64::from(p);
                a.iter()
                    .zip(b.iter())
                    .map(|(x, y)| (x - y).abs().powf(p))
                    .sum::<f64>()
                    .powf(p.recip())
            }
            Self::Chebyshev => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y).abs())
                .fold(0.0, f64::max),
            Self::Cosine => {
                let dot = a.dot(&b);
                let norms = a.dot(&a).sqrt() * b.dot(&b).sqrt();
                // Zero vectors have no direction
                if norms == 0.0 {
                    1.0
                } else {
                    1.0 - dot / norms
                }
            }
        }
    }
}
