//! Capacity-indexed dynamic programming for the 0/1 knapsack problem.
//!
//! The table holds one cell per capacity. `dp[c]` is the best value reachable
//! with the items processed so far and total weight at most `c`. Each item
//! sweeps the table from the top down so it is counted at most once.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KnapsackError, Result};
use crate::instance::{Item, ProblemInstance};

/// Default ceiling on DP table cells (1 GiB of `u64` cells)
pub const DEFAULT_MAX_TABLE_CELLS: usize = 1 << 27;

/// Configuration for the optimizer
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Largest table the optimizer may allocate, in cells
    pub max_table_cells: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_table_cells: DEFAULT_MAX_TABLE_CELLS,
        }
    }
}

/// Result of an optimizer run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResult {
    /// Best total value within capacity
    pub max_value: u64,
    /// Items that went through the table sweep
    pub items_considered: usize,
    /// Items heavier than the effective capacity
    pub items_skipped: usize,
    /// Cells allocated for the table (0 for trivial instances)
    pub table_cells: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
}

/// Maximum total value achievable without exceeding the capacity.
pub fn optimize(instance: &ProblemInstance) -> Result<u64> {
    optimize_with_config(instance, &OptimizerConfig::default()).map(|result| result.max_value)
}

/// Run the optimizer and report table statistics alongside the optimum.
pub fn optimize_with_config(
    instance: &ProblemInstance,
    config: &OptimizerConfig,
) -> Result<OptimizeResult> {
    let start_time = Instant::now();

    if instance.is_trivial() {
        return Ok(OptimizeResult {
            max_value: 0,
            items_considered: 0,
            items_skipped: 0,
            table_cells: 0,
            time_elapsed_ms: 0,
        });
    }

    // Capacity beyond the combined weight of every item can never be used
    let top = instance.capacity.min(instance.total_weight());
    let cells = table_cells(top, config.max_table_cells).ok_or(KnapsackError::CapacityTooLarge {
        capacity: instance.capacity,
        limit: config.max_table_cells,
    })?;
    debug!(
        capacity = instance.capacity,
        effective_capacity = top,
        cells,
        "Allocating DP table"
    );

    let mut dp = allocate_table(cells)?;
    let mut items_considered = 0;
    let mut items_skipped = 0;

    for (index, item) in instance.items.iter().enumerate() {
        if u64::from(item.weight) > top {
            debug!(index, weight = item.weight, "Item heavier than capacity, skipping");
            items_skipped += 1;
            continue;
        }
        relax(&mut dp, item)?;
        items_considered += 1;
    }

    Ok(OptimizeResult {
        max_value: dp[cells - 1],
        items_considered,
        items_skipped,
        table_cells: cells,
        time_elapsed_ms: start_time.elapsed().as_millis() as u64,
    })
}

/// Number of cells for a table topped at `top`, if it fits the limit
fn table_cells(top: u64, limit: usize) -> Option<usize> {
    usize::try_from(top)
        .ok()
        .and_then(|top| top.checked_add(1))
        .filter(|&cells| cells <= limit)
}

/// Zeroed table of `cells` cells, or an error when memory runs out
fn allocate_table(cells: usize) -> Result<Vec<u64>> {
    let mut dp = Vec::new();
    dp.try_reserve_exact(cells)
        .map_err(|source| KnapsackError::TableAllocation { cells, source })?;
    dp.resize(cells, 0);
    Ok(dp)
}

/// Fold one item into the table. Capacities are visited in descending order
/// so `dp[c - weight]` still holds the value from before this item.
fn relax(dp: &mut [u64], item: &Item) -> Result<()> {
    let weight = item.weight as usize;
    let value = u64::from(item.value);

    for c in (weight..dp.len()).rev() {
        let with_item = dp[c - weight]
            .checked_add(value)
            .ok_or(KnapsackError::ArithmeticOverflow)?;
        if with_item > dp[c] {
            dp[c] = with_item;
        }
    }
    Ok(())
}
