//! Contiguous row-major matrix storage.
//!
//! The benchmark matrix is a single owned `Vec<i32>` indexed as
//! `row * dim + col`. Doubling uses wrapping arithmetic: a full sweep
//! runs 35 doublings over the same buffer (7 variants x 5 trials),
//! which overflows `i32` by design, so overflow must wrap rather than
//! panic in debug builds.

/// A square matrix of `i32` stored contiguously in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    cells: Vec<i32>,
    dim: usize,
}

impl Matrix {
    /// Allocate a `dim x dim` matrix with every cell set to `value`.
    pub fn filled(dim: usize, value: i32) -> Self {
        Self { cells: vec![value; dim * dim], dim }
    }

    /// Edge length of the matrix.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Total number of cells (`dim * dim`).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the matrix has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.dim && col < self.dim);
        row * self.dim + col
    }

    /// Read the cell at `[row][col]`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.cells[self.idx(row, col)]
    }

    /// Overwrite the cell at `[row][col]`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: i32) {
        let i = self.idx(row, col);
        self.cells[i] = value;
    }

    /// Double the cell at `[row][col]` in place, wrapping on overflow.
    #[inline]
    pub fn double(&mut self, row: usize, col: usize) {
        let i = self.idx(row, col);
        self.cells[i] = self.cells[i].wrapping_mul(2);
    }

    /// The underlying cells in row-major order.
    pub fn as_slice(&self) -> &[i32] {
        &self.cells
    }

    /// Mutable view of the underlying cells in row-major order.
    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_sets_every_cell() {
        let m = Matrix::filled(4, 1);
        assert_eq!(m.dim(), 4);
        assert_eq!(m.len(), 16);
        assert!(m.as_slice().iter().all(|&c| c == 1));
    }

    #[test]
    fn row_major_layout() {
        let mut m = Matrix::filled(3, 0);
        m.set(1, 2, 7);
        assert_eq!(m.as_slice()[1 * 3 + 2], 7);
        assert_eq!(m.get(1, 2), 7);
    }

    #[test]
    fn double_doubles_in_place() {
        let mut m = Matrix::filled(2, 3);
        m.double(0, 1);
        assert_eq!(m.get(0, 1), 6);
        assert_eq!(m.get(0, 0), 3);
    }

    #[test]
    fn double_wraps_on_overflow() {
        let mut m = Matrix::filled(1, i32::MAX);
        m.double(0, 0);
        assert_eq!(m.get(0, 0), i32::MAX.wrapping_mul(2));
    }

    #[test]
    fn zero_dim_matrix_is_empty() {
        let m = Matrix::filled(0, 1);
        assert!(m.is_empty());
        assert_eq!(m.len(), 0);
    }
}
