//! Summary Statistics
//!
//! Plain descriptive statistics over raw run times, matching what hyperfine
//! reports: mean, median, sample standard deviation, min and max, all computed
//! over every run (no outlier removal).

/// Descriptive statistics of a set of run times
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Arithmetic mean
    pub mean: f64,
    /// Median (linear interpolation)
    pub median: f64,
    /// Sample standard deviation; `None` below two samples
    pub std_dev: Option<f64>,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Number of samples
    pub count: usize,
}

/// Compute summary statistics; an empty slice yields all zeros
pub fn compute_summary(samples: &[f64]) -> Summary {
    if samples.is_empty() {
        return Summary {
            mean: 0.0,
            median: 0.0,
            std_dev: None,
            min: 0.0,
            max: 0.0,
            count: 0,
        };
    }

    let n = samples.len();
    let mean = samples.iter().sum::<f64>() / n as f64;

    let std_dev = if n < 2 {
        None
    } else {
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        Some(variance.sqrt())
    };

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Summary {
        mean,
        median: compute_percentile(samples, 50.0),
        std_dev,
        min,
        max,
        count: n,
    }
}

/// Compute a single percentile, interpolating linearly between nearest ranks
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    if samples.len() == 1 {
        return samples[0];
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let rank = (percentile / 100.0) * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}
