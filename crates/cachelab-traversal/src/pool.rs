//! Rayon-backed worker pool with named scheduling strategies.
//!
//! The parallel traversal variants differ only in which loop level is
//! distributed and how work is scheduled. Making both choices explicit
//! here lets the "correct" and "anti-pattern" variants exist as named
//! strategies instead of accidental artifacts of loop nesting.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;

/// Configuration for [`WorkerPool`].
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker threads. Defaults to the number of available CPUs.
    pub num_threads: usize,
    /// Prefix for worker thread names.
    pub name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { num_threads: num_cpus::get().max(1), name_prefix: "cachelab".to_string() }
    }
}

/// How a partitioned loop level is distributed across workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Contiguous chunks assigned up front, one chunk per worker.
    Static,
    /// Per-index tasks claimed by work stealing as workers go idle.
    Dynamic,
}

/// A worker pool shared by all parallel traversal variants.
///
/// One region is active at a time; [`WorkerPool::for_each`] joins
/// fully before returning, so trials never overlap.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    config: PoolConfig,
    regions_entered: AtomicU64,
}

impl WorkerPool {
    /// Build a pool from the given configuration.
    pub fn new(config: PoolConfig) -> Result<Self, rayon::ThreadPoolBuildError> {
        let prefix = config.name_prefix.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .thread_name(move |idx| format!("{prefix}-{idx}"))
            .build()?;
        Ok(Self { pool, config, regions_entered: AtomicU64::new(0) })
    }

    /// Build a pool with default configuration.
    pub fn with_defaults() -> Result<Self, rayon::ThreadPoolBuildError> {
        Self::new(PoolConfig::default())
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.config.num_threads
    }

    /// The configuration this pool was built with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// How many parallel regions this pool has entered so far.
    ///
    /// The inner-fanout anti-pattern enters one region per matrix row;
    /// the counter makes that overhead observable in tests.
    pub fn regions_entered(&self) -> u64 {
        self.regions_entered.load(Ordering::Relaxed)
    }

    /// Apply `f` to every index in `0..n`, distributed per `schedule`.
    ///
    /// Blocks until every index has been processed and all workers have
    /// joined. Each index is visited exactly once.
    pub fn for_each<F>(&self, n: usize, schedule: Schedule, f: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        self.regions_entered.fetch_add(1, Ordering::Relaxed);
        match schedule {
            Schedule::Static => {
                let chunk = n.div_ceil(self.config.num_threads).max(1);
                self.pool.install(|| {
                    rayon::scope(|s| {
                        let mut start = 0;
                        while start < n {
                            let end = (start + chunk).min(n);
                            let f_ref = &f;
                            s.spawn(move |_| {
                                for i in start..end {
                                    f_ref(i);
                                }
                            });
                            start = end;
                        }
                    });
                });
            }
            Schedule::Dynamic => {
                self.pool.install(|| {
                    (0..n).into_par_iter().with_min_len(1).for_each(|i| f(i));
                });
            }
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("num_threads", &self.config.num_threads)
            .field("regions_entered", &self.regions_entered())
            .finish()
    }
}

/// Shared mutable view over the matrix cells for strided parallel writes.
///
/// Safe wrappers (`chunks_mut` and friends) can only hand out
/// contiguous disjoint ranges, but the thrashing variants partition by
/// column: each worker owns a strided set of cells. This shim makes the
/// aliasing contract explicit instead of baking it into each variant.
pub struct SharedCells<'a> {
    ptr: *mut i32,
    len: usize,
    _marker: PhantomData<&'a mut [i32]>,
}

// SAFETY: `SharedCells` is only handed to parallel regions whose index
// partitioning assigns every cell index to at most one worker. Under
// that contract no two threads ever write the same cell, and the
// borrow of the backing slice outlives the region.
unsafe impl Send for SharedCells<'_> {}
unsafe impl Sync for SharedCells<'_> {}

impl<'a> SharedCells<'a> {
    /// Wrap a mutable cell slice for the duration of one parallel region.
    pub fn new(cells: &'a mut [i32]) -> Self {
        Self { ptr: cells.as_mut_ptr(), len: cells.len(), _marker: PhantomData }
    }

    /// Number of cells in the wrapped slice.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the wrapped slice is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Double the cell at `idx` in place, wrapping on overflow.
    ///
    /// # Safety
    ///
    /// `idx` must be in bounds, and no other thread may access the same
    /// index while this parallel region is active.
    #[inline]
    pub unsafe fn double(&self, idx: usize) {
        debug_assert!(idx < self.len);
        let cell = self.ptr.add(idx);
        *cell = (*cell).wrapping_mul(2);
    }

    /// Issue a best-effort prefetch hint for the cell at `idx`.
    ///
    /// Out-of-range indices are ignored, so callers may hint "the next
    /// row/tile" without guarding the final iteration.
    #[inline]
    pub fn prefetch(&self, idx: usize) {
        if idx < self.len {
            prefetch_hint(self.ptr as *const i32, idx);
        }
    }
}

/// Architecture-specific read prefetch; no-op where unsupported.
#[inline]
pub(crate) fn prefetch_hint(base: *const i32, idx: usize) {
    #[cfg(target_arch = "x86_64")]
    // SAFETY: the hinted address lies within the live allocation the
    // caller derived `base` from; prefetch performs no access.
    unsafe {
        use std::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};
        _mm_prefetch(base.add(idx).cast::<i8>(), _MM_HINT_T0);
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        let _ = (base, idx);
    }
}
