//! Repeated optimizer runs with timing statistics.
//!
//! Each sample is one full `optimize_with_config` call, table allocation
//! included. A few warmup runs are discarded before sampling starts.

use std::hint::black_box;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KnapsackError, Result};
use crate::instance::ProblemInstance;
use crate::optimizer::{optimize_with_config, OptimizerConfig};

/// Configuration for a benchmark run
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Timed runs
    pub iterations: usize,
    /// Untimed runs before sampling
    pub warmup: usize,
    pub optimizer: OptimizerConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            warmup: 3,
            optimizer: OptimizerConfig::default(),
        }
    }
}

/// Timing statistics over all samples, in nanoseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingSummary {
    pub mean_ns: f64,
    pub median_ns: f64,
    /// Sample standard deviation (0 for a single sample)
    pub std_dev_ns: f64,
    pub min_ns: u64,
    pub max_ns: u64,
}

/// Result of a benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResult {
    /// Optimum found (identical on every run)
    pub max_value: u64,
    pub iterations: usize,
    pub table_cells: usize,
    pub timing: TimingSummary,
}

/// Run the optimizer `config.iterations` times and summarize the timings.
pub fn run_benchmark(instance: &ProblemInstance, config: &BenchmarkConfig) -> Result<BenchmarkResult> {
    if config.iterations == 0 {
        return Err(KnapsackError::InvalidConfig(
            "benchmark needs at least one iteration".to_string(),
        ));
    }

    for _ in 0..config.warmup {
        optimize_with_config(black_box(instance), &config.optimizer)?;
    }

    let mut samples = Vec::with_capacity(config.iterations);
    let mut last = None;
    for _ in 0..config.iterations {
        let start = Instant::now();
        let result = optimize_with_config(black_box(instance), &config.optimizer)?;
        samples.push(start.elapsed().as_nanos() as u64);
        last = Some(black_box(result));
    }

    let result = last.ok_or_else(|| KnapsackError::InvalidConfig("no samples".to_string()))?;
    let timing = summarize(&samples);
    debug!(
        iterations = config.iterations,
        mean_ns = timing.mean_ns,
        "Benchmark finished"
    );

    Ok(BenchmarkResult {
        max_value: result.max_value,
        iterations: config.iterations,
        table_cells: result.table_cells,
        timing,
    })
}

/// Mean, median, sample standard deviation and range of a non-empty sample set
fn summarize(samples: &[u64]) -> TimingSummary {
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let count = sorted.len() as f64;
    let mean = sorted.iter().map(|&s| s as f64).sum::<f64>() / count;

    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[mid] as f64
    };

    let std_dev = if sorted.len() > 1 {
        let variance = sorted
            .iter()
            .map(|&s| (s as f64 - mean).powi(2))
            .sum::<f64>()
            / (count - 1.0);
        variance.sqrt()
    } else {
        0.0
    };

    TimingSummary {
        mean_ns: mean,
        median_ns: median,
        std_dev_ns: std_dev,
        min_ns: sorted[0],
        max_ns: sorted[sorted.len() - 1],
    }
}
