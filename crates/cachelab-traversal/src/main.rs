//! Fixed experiment runner: executes both traversal sweeps and writes
//! one CSV per sweep. No command-line arguments; every parameter is a
//! compiled-in constant.

use anyhow::{Context, Result};
use tracing::info;

use cachelab_traversal::report::CsvReport;
use cachelab_traversal::sweep::{
    run_cache_sweep, run_parallel_sweep, sweep_header, CACHE_COLUMN_ORDER,
    PARALLEL_COLUMN_ORDER,
};
use cachelab_traversal::WorkerPool;

const SPEED_CSV: &str = "speed_comparison.csv";
const MP_CSV: &str = "mp_comparison.csv";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let pool = WorkerPool::with_defaults().context("building worker pool")?;
    info!(threads = pool.num_threads(), "worker pool ready");

    let mut speed = CsvReport::with_header(sweep_header(&CACHE_COLUMN_ORDER));
    for row in run_cache_sweep(&pool) {
        speed.push_sweep_row(&row);
    }
    std::fs::write(SPEED_CSV, speed.render()?).with_context(|| format!("writing {SPEED_CSV}"))?;
    info!(rows = speed.row_count(), "wrote {SPEED_CSV}");

    let mut mp = CsvReport::with_header(sweep_header(&PARALLEL_COLUMN_ORDER));
    for row in run_parallel_sweep(&pool) {
        mp.push_sweep_row(&row);
    }
    std::fs::write(MP_CSV, mp.render()?).with_context(|| format!("writing {MP_CSV}"))?;
    info!(rows = mp.row_count(), "wrote {MP_CSV}");

    Ok(())
}
