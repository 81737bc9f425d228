//! Matrix traversal micro-benchmarks.
//!
//! Measures the wall-clock cost of distinct memory-access strategies
//! over square matrices: row-major vs column-major traversal order,
//! blocked/tiled access with prefetch hints, and several parallel
//! variants with differing loop granularity and scheduling. Each
//! variant doubles every cell of the matrix exactly once per trial;
//! only the access order differs, so elapsed time isolates the cost of
//! the memory pattern itself.
//!
//! The [`sweep`] module drives the fixed experiment: a descending
//! sequence of matrix sizes, a fixed trial count per variant, and one
//! CSV row of averaged timings per size.

pub mod matrix;
pub mod pool;
pub mod report;
pub mod sweep;
pub mod variants;

pub use matrix::Matrix;
pub use pool::{PoolConfig, Schedule, WorkerPool};
pub use report::CsvReport;
pub use sweep::{SizeStep, SweepConfig, SweepRow};
pub use variants::Variant;
