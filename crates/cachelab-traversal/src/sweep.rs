//! Fixed sweep drivers over descending matrix sizes.
//!
//! Two entry points mirror the two historical harnesses: the full
//! cache sweep (all seven variants, sizes halving from 2048 down to
//! 16) and the parallel-only sweep (four variants, sizes stepping down
//! from 32768 by a fixed subtraction). The halve-vs-subtract asymmetry
//! is deliberate legacy behavior; see DESIGN.md.
//!
//! Per size the matrix is allocated and filled once, then every
//! variant runs [`TRIALS`] times in a fixed execution order with no
//! reset in between: later trials and later variants operate on cell
//! values already doubled by everything before them. Only wall time is
//! recorded, so the compounding values are harmless, but the quirk is
//! preserved rather than silently fixed.

use std::time::Duration;

use tracing::{debug, info};

use crate::matrix::Matrix;
use crate::pool::WorkerPool;
use crate::variants::Variant;

/// Every matrix cell starts at this value.
pub const FILL_VALUE: i32 = 1;
/// Trials per (size, variant) pair; reported times are the mean.
pub const TRIALS: u32 = 5;
/// Starting candidate for the blocked variant's tile edge.
pub const BLOCK_SEED: usize = 1024;

/// Cache sweep: starting size, inclusive floor.
pub const CACHE_START: usize = 2048;
pub const CACHE_FLOOR: usize = 16;

/// Parallel-only sweep: starting size, exclusive floor, step.
pub const PARALLEL_START: usize = 32768;
pub const PARALLEL_FLOOR: usize = 2048;
pub const PARALLEL_STEP: usize = 2048;

/// Execution order of the cache sweep (the order trials run in).
pub const CACHE_EXEC_ORDER: [Variant; 7] = [
    Variant::RowStride,
    Variant::ColStride,
    Variant::Blocked,
    Variant::ParInnerFanout,
    Variant::ParRowStride,
    Variant::ParColStatic,
    Variant::ParColDynamic,
];

/// Column order of the cache sweep CSV (differs from execution order;
/// both are preserved from the original harness).
pub const CACHE_COLUMN_ORDER: [Variant; 7] = [
    Variant::RowStride,
    Variant::ColStride,
    Variant::Blocked,
    Variant::ParColDynamic,
    Variant::ParRowStride,
    Variant::ParInnerFanout,
    Variant::ParColStatic,
];

/// Execution order of the parallel-only sweep.
pub const PARALLEL_EXEC_ORDER: [Variant; 4] = [
    Variant::ParInnerFanout,
    Variant::ParRowStride,
    Variant::ParColStatic,
    Variant::ParColDynamic,
];

/// Column order of the parallel-only sweep CSV.
pub const PARALLEL_COLUMN_ORDER: [Variant; 4] = [
    Variant::ParInnerFanout,
    Variant::ParRowStride,
    Variant::ParColDynamic,
    Variant::ParColStatic,
];

/// How the sweep steps from one matrix size to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeStep {
    /// `size >>= 1` each iteration; the floor itself is still run.
    Halve,
    /// `size -= step` each iteration; stops once `size <= floor`.
    Subtract(usize),
}

/// Parameters of one sweep run.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub start: usize,
    pub floor: usize,
    pub step: SizeStep,
    pub trials: u32,
}

impl SweepConfig {
    /// The full cache-comparison sweep: 2048 halving down to 16.
    pub fn cache() -> Self {
        Self { start: CACHE_START, floor: CACHE_FLOOR, step: SizeStep::Halve, trials: TRIALS }
    }

    /// The parallel-only sweep: 32768 stepping down by 2048.
    pub fn parallel() -> Self {
        Self {
            start: PARALLEL_START,
            floor: PARALLEL_FLOOR,
            step: SizeStep::Subtract(PARALLEL_STEP),
            trials: TRIALS,
        }
    }

    /// The descending size schedule this configuration produces.
    pub fn sizes(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut size = self.start;
        match self.step {
            SizeStep::Halve => {
                while size >= self.floor && size > 0 {
                    out.push(size);
                    size >>= 1;
                }
            }
            SizeStep::Subtract(step) => {
                while size > self.floor {
                    out.push(size);
                    size = size.saturating_sub(step.max(1));
                }
            }
        }
        out
    }
}

/// One CSV data row: a matrix size plus the averaged elapsed seconds
/// of each variant, already in column order.
#[derive(Debug, Clone)]
pub struct SweepRow {
    pub size: usize,
    pub averages: Vec<f64>,
}

/// Compute the blocked variant's tile edge for a matrix dimension.
///
/// Starts from [`BLOCK_SEED`] and halves while the candidate is a
/// multiple of `dim`, then halves once more. The result is a power of
/// two strictly less than `dim` that evenly divides it.
pub fn block_size_for(dim: usize) -> usize {
    debug_assert!(dim >= 2);
    let mut block = BLOCK_SEED;
    while block % dim == 0 {
        block >>= 1;
    }
    block >> 1
}

/// Run one sweep: for each size, run every variant `trials` times in
/// `exec_order`, then average and emit one row in `column_order`.
pub fn run_sweep(
    config: &SweepConfig,
    exec_order: &[Variant],
    column_order: &[Variant],
    pool: &WorkerPool,
) -> Vec<SweepRow> {
    let trials = config.trials.max(1);
    let mut rows = Vec::new();

    for size in config.sizes() {
        let block = block_size_for(size);
        debug!(size, block, "starting size iteration");

        let mut matrix = Matrix::filled(size, FILL_VALUE);
        let mut totals = vec![Duration::ZERO; exec_order.len()];

        for _ in 0..trials {
            for (slot, variant) in exec_order.iter().enumerate() {
                totals[slot] += variant.run(&mut matrix, pool, block);
            }
        }

        let averages = column_order
            .iter()
            .map(|variant| {
                let slot = exec_order
                    .iter()
                    .position(|v| v == variant)
                    .expect("column order must be a permutation of exec order");
                totals[slot].as_secs_f64() / f64::from(trials)
            })
            .collect();

        info!(size, "matrix size {size} x {size} done");
        rows.push(SweepRow { size, averages });
    }

    rows
}

/// The cache sweep with its fixed orders.
pub fn run_cache_sweep(pool: &WorkerPool) -> Vec<SweepRow> {
    run_sweep(&SweepConfig::cache(), &CACHE_EXEC_ORDER, &CACHE_COLUMN_ORDER, pool)
}

/// The parallel-only sweep with its fixed orders.
pub fn run_parallel_sweep(pool: &WorkerPool) -> Vec<SweepRow> {
    run_sweep(&SweepConfig::parallel(), &PARALLEL_EXEC_ORDER, &PARALLEL_COLUMN_ORDER, pool)
}

/// CSV header for a sweep: `matrix_size` then one column per variant.
pub fn sweep_header(column_order: &[Variant]) -> Vec<String> {
    let mut header = Vec::with_capacity(column_order.len() + 1);
    header.push("matrix_size".to_string());
    header.extend(column_order.iter().map(|v| v.label().to_string()));
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_schedule_is_eight_sizes_down_to_sixteen() {
        let sizes = SweepConfig::cache().sizes();
        assert_eq!(sizes, vec![2048, 1024, 512, 256, 128, 64, 32, 16]);
    }

    #[test]
    fn parallel_schedule_is_fifteen_sizes() {
        let sizes = SweepConfig::parallel().sizes();
        assert_eq!(sizes.len(), 15);
        assert_eq!(sizes[0], 32768);
        assert_eq!(*sizes.last().unwrap(), 4096);
        assert!(sizes.windows(2).all(|w| w[0] - w[1] == PARALLEL_STEP));
    }

    #[test]
    fn block_size_divides_and_is_power_of_two_below_dim() {
        for dim in [16usize, 32, 64, 128, 256, 512, 1024, 2048] {
            let block = block_size_for(dim);
            assert!(block.is_power_of_two(), "dim {dim}: block {block}");
            assert!(block < dim, "dim {dim}: block {block}");
            assert_eq!(dim % block, 0, "dim {dim}: block {block}");
        }
    }

    #[test]
    fn block_size_known_values() {
        assert_eq!(block_size_for(2048), 512);
        assert_eq!(block_size_for(1024), 256);
        assert_eq!(block_size_for(16), 4);
    }

    #[test]
    fn rows_match_column_order_width() {
        let pool = WorkerPool::with_defaults().unwrap();
        let config = SweepConfig { start: 32, floor: 16, step: SizeStep::Halve, trials: 2 };
        let rows = run_sweep(&config, &CACHE_EXEC_ORDER, &CACHE_COLUMN_ORDER, &pool);
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.averages.len(), CACHE_COLUMN_ORDER.len());
            assert!(row.averages.iter().all(|&avg| avg >= 0.0));
        }
    }

    #[test]
    fn parallel_orders_are_permutations() {
        for v in PARALLEL_COLUMN_ORDER {
            assert!(PARALLEL_EXEC_ORDER.contains(&v));
        }
        for v in CACHE_COLUMN_ORDER {
            assert!(CACHE_EXEC_ORDER.contains(&v));
        }
    }

    #[test]
    fn header_prepends_size_column() {
        let header = sweep_header(&PARALLEL_COLUMN_ORDER);
        assert_eq!(header.len(), 5);
        assert_eq!(header[0], "matrix_size");
        assert_eq!(header[1], "par_inner_fanout");
        assert_eq!(header[4], "par_col_static");
    }

    #[test]
    fn sweep_with_one_trial_averages_to_total() {
        let pool = WorkerPool::with_defaults().unwrap();
        let config = SweepConfig { start: 16, floor: 16, step: SizeStep::Halve, trials: 1 };
        let rows = run_sweep(&config, &PARALLEL_EXEC_ORDER, &PARALLEL_COLUMN_ORDER, &pool);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].size, 16);
    }
}
