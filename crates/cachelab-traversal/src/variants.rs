//! The traversal variants under benchmark.
//!
//! Every variant has the same observable effect: each cell of the
//! matrix is doubled exactly once (wrapping). They differ only in
//! traversal order, tiling, and how (or whether) the work is
//! distributed across the worker pool, so their elapsed times compare
//! memory-access strategies in isolation.
//!
//! Timing is taken inside each variant around the traversal itself,
//! excluding pool construction and matrix allocation.

use std::fmt;
use std::time::{Duration, Instant};

use crate::matrix::Matrix;
use crate::pool::{prefetch_hint, Schedule, SharedCells, WorkerPool};

/// One traversal/transform strategy under benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Column-outer, row-inner: stride-hostile order.
    RowStride,
    /// Row-outer, column-inner: contiguous per inner iteration.
    ColStride,
    /// Square tiles with a prefetch hint for the next tile.
    Blocked,
    /// Anti-pattern: a fresh parallel region per row, fanning the
    /// current row's columns across the pool.
    ParInnerFanout,
    /// Hostile order distributed by outer column index.
    ParRowStride,
    /// Rows fanned across the pool, static chunks: the intended-correct
    /// parallel baseline.
    ParColStatic,
    /// Same access order as [`Variant::ParColStatic`] with dynamic
    /// (work-stealing) distribution.
    ParColDynamic,
}

impl Variant {
    /// Column label used in CSV output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::RowStride => "row_stride",
            Self::ColStride => "col_stride",
            Self::Blocked => "blocked",
            Self::ParInnerFanout => "par_inner_fanout",
            Self::ParRowStride => "par_row_stride",
            Self::ParColStatic => "par_col_static",
            Self::ParColDynamic => "par_col_dynamic",
        }
    }

    /// Run one trial of this variant, returning elapsed wall time.
    ///
    /// `block` is only consulted by [`Variant::Blocked`] and must
    /// evenly divide the matrix dimension.
    pub fn run(self, matrix: &mut Matrix, pool: &WorkerPool, block: usize) -> Duration {
        match self {
            Self::RowStride => row_stride(matrix),
            Self::ColStride => col_stride(matrix),
            Self::Blocked => blocked(matrix, block),
            Self::ParInnerFanout => par_inner_fanout(matrix, pool),
            Self::ParRowStride => par_row_stride(matrix, pool),
            Self::ParColStatic => par_col_stride(matrix, pool, Schedule::Static),
            Self::ParColDynamic => par_col_stride(matrix, pool, Schedule::Dynamic),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stride-hostile traversal: outer loop over columns, inner over rows,
/// touching one cell per cache line on large matrices.
pub fn row_stride(matrix: &mut Matrix) -> Duration {
    let n = matrix.dim();
    let start = Instant::now();
    for col in 0..n {
        for row in 0..n {
            matrix.double(row, col);
        }
    }
    start.elapsed()
}

/// Cache-friendly traversal: row-outer, column-inner, contiguous
/// within each inner loop.
pub fn col_stride(matrix: &mut Matrix) -> Duration {
    let n = matrix.dim();
    let start = Instant::now();
    for row in 0..n {
        for col in 0..n {
            matrix.double(row, col);
        }
    }
    start.elapsed()
}

/// Blocked/tiled traversal with a prefetch hint for the next tile's
/// leading cache line.
///
/// Visits tile-row, then global row within the tile, then tile-column,
/// then within-tile column. `block` must be a positive divisor of the
/// matrix dimension.
pub fn blocked(matrix: &mut Matrix, block: usize) -> Duration {
    let n = matrix.dim();
    debug_assert!(block > 0 && n % block == 0, "block {block} must divide dim {n}");
    let start = Instant::now();
    for tile_row in (0..n).step_by(block) {
        for row in tile_row..tile_row + block {
            for tile_col in (0..n).step_by(block) {
                let next_tile = row * n + tile_col + block;
                if next_tile < matrix.len() {
                    prefetch_hint(matrix.as_slice().as_ptr(), next_tile);
                }
                for col in tile_col..tile_col + block {
                    matrix.double(row, col);
                }
            }
        }
    }
    start.elapsed()
}

/// Correct parallel baseline: rows distributed across the pool, each
/// worker traversing its rows in cache-friendly order.
pub fn par_col_stride(matrix: &mut Matrix, pool: &WorkerPool, schedule: Schedule) -> Duration {
    let n = matrix.dim();
    let cells = SharedCells::new(matrix.as_mut_slice());
    let start = Instant::now();
    pool.for_each(n, schedule, |row| {
        for col in 0..n {
            // SAFETY: worker owns row `row` exclusively; indices
            // row*n..row*n+n never overlap between workers.
            unsafe { cells.double(row * n + col) };
        }
    });
    start.elapsed()
}

/// Anti-pattern: enters a fresh parallel region for every row, fanning
/// the current row's columns across the pool after hinting the next
/// row. The repeated region entry/exit dominates on small rows; kept
/// as a named strategy so the poor granularity is reproducible.
pub fn par_inner_fanout(matrix: &mut Matrix, pool: &WorkerPool) -> Duration {
    let n = matrix.dim();
    let cells = SharedCells::new(matrix.as_mut_slice());
    let start = Instant::now();
    for row in 0..n {
        cells.prefetch((row + 1) * n);
        pool.for_each(n, Schedule::Static, |col| {
            // SAFETY: within this region each worker owns distinct
            // column indices of the single row `row`.
            unsafe { cells.double(row * n + col) };
        });
    }
    start.elapsed()
}

/// Thrashing: the hostile column-outer order distributed by outer
/// index, demonstrating that parallelism does not fix a bad access
/// pattern.
pub fn par_row_stride(matrix: &mut Matrix, pool: &WorkerPool) -> Duration {
    let n = matrix.dim();
    let cells = SharedCells::new(matrix.as_mut_slice());
    let start = Instant::now();
    pool.for_each(n, Schedule::Static, |col| {
        for row in 0..n {
            // SAFETY: worker owns column `col` exclusively; the strided
            // index sets {col, col+n, ...} are disjoint across workers.
            unsafe { cells.double(row * n + col) };
        }
    });
    start.elapsed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::block_size_for;

    const ALL: [Variant; 7] = [
        Variant::RowStride,
        Variant::ColStride,
        Variant::Blocked,
        Variant::ParInnerFanout,
        Variant::ParRowStride,
        Variant::ParColStatic,
        Variant::ParColDynamic,
    ];

    fn pool() -> WorkerPool {
        WorkerPool::with_defaults().unwrap()
    }

    #[test]
    fn every_variant_doubles_every_cell_exactly_once() {
        let pool = pool();
        for variant in ALL {
            let dim = 16;
            let mut m = Matrix::filled(dim, 3);
            variant.run(&mut m, &pool, block_size_for(dim));
            assert!(
                m.as_slice().iter().all(|&c| c == 6),
                "{variant} skipped or double-touched a cell"
            );
        }
    }

    #[test]
    fn variants_agree_bit_for_bit_after_equal_trials() {
        let pool = pool();
        let dim = 16;
        let block = block_size_for(dim);
        // Non-uniform input so traversal-order bugs show up.
        let mut reference = Matrix::filled(dim, 0);
        for row in 0..dim {
            for col in 0..dim {
                reference.set(row, col, (row * dim + col) as i32 - 40);
            }
        }
        let mut expected = reference.clone();
        for _ in 0..3 {
            col_stride(&mut expected);
        }
        for variant in ALL {
            let mut m = reference.clone();
            for _ in 0..3 {
                variant.run(&mut m, &pool, block);
            }
            assert_eq!(m, expected, "{variant} diverged from reference");
        }
    }

    #[test]
    fn trials_compound_without_reset() {
        let pool = pool();
        let mut m = Matrix::filled(8, 1);
        let block = block_size_for(8);
        for _ in 0..5 {
            Variant::Blocked.run(&mut m, &pool, block);
        }
        // No reset between trials: 1 doubled five times.
        assert!(m.as_slice().iter().all(|&c| c == 32));
    }

    #[test]
    fn inner_fanout_enters_one_region_per_row() {
        let pool = pool();
        let dim = 8;
        let mut m = Matrix::filled(dim, 1);
        let before = pool.regions_entered();
        par_inner_fanout(&mut m, &pool);
        assert_eq!(pool.regions_entered() - before, dim as u64);
    }

    #[test]
    fn outer_variants_enter_a_single_region() {
        let pool = pool();
        let mut m = Matrix::filled(8, 1);
        let before = pool.regions_entered();
        par_col_stride(&mut m, &pool, Schedule::Static);
        par_row_stride(&mut m, &pool);
        par_col_stride(&mut m, &pool, Schedule::Dynamic);
        assert_eq!(pool.regions_entered() - before, 3);
    }

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<&str> = ALL.iter().map(|v| v.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), ALL.len());
    }

    #[test]
    fn display_matches_label() {
        assert_eq!(Variant::Blocked.to_string(), "blocked");
        assert_eq!(Variant::ParColDynamic.to_string(), "par_col_dynamic");
    }
}
