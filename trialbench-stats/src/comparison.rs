//! Baseline-Relative Comparison
//!
//! Every non-baseline sample is expressed as a ratio of the baseline:
//! `ratio = sample.metric / baseline.metric`. A ratio of 2.0 means "twice as
//! slow as the baseline". No rounding happens here; formatting belongs to the
//! reporter.

use crate::{BenchSample, Measurement};
use serde::{Deserialize, Serialize};

/// Ratios of a sample's statistics over the baseline's
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeRatios {
    /// `sample.mean / baseline.mean`
    pub mean: f64,
    /// `sample.median / baseline.median`
    pub median: f64,
    /// `sample.stddev / baseline.stddev`, when both are available
    pub stddev: Option<f64>,
    /// `sample.min / baseline.min`
    pub min: f64,
    /// `sample.max / baseline.max`
    pub max: f64,
}

impl RelativeRatios {
    /// Ratios of `sample` relative to `baseline`
    pub fn between(sample: &Measurement, baseline: &Measurement) -> Self {
        Self {
            mean: sample.mean / baseline.mean,
            median: sample.median / baseline.median,
            stddev: match (sample.stddev, baseline.stddev) {
                (Some(s), Some(b)) => Some(s / b),
                _ => None,
            },
            min: sample.min / baseline.min,
            max: sample.max / baseline.max,
        }
    }
}

/// A non-baseline sample together with its ratios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedSample {
    /// The sample
    #[serde(flatten)]
    pub sample: BenchSample,
    /// Ratios over the baseline
    pub ratios: RelativeRatios,
}

/// Final artifact of one benchmark: the baseline and every other command
/// relative to it, sorted by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    /// Benchmark name
    pub name: String,
    /// Baseline sample
    pub baseline: BenchSample,
    /// Non-baseline samples, sorted by name (byte-wise, case-sensitive)
    pub compare: Vec<ComparedSample>,
}

impl BenchmarkComparison {
    /// Build a comparison, sorting `others` by name and computing their ratios
    pub fn new(name: impl Into<String>, baseline: BenchSample, mut others: Vec<BenchSample>) -> Self {
        others.sort_by(|a, b| a.name.cmp(&b.name));
        let compare = others
            .into_iter()
            .map(|sample| ComparedSample {
                ratios: RelativeRatios::between(&sample.stats, &baseline.stats),
                sample,
            })
            .collect();

        Self {
            name: name.into(),
            baseline,
            compare,
        }
    }
}
