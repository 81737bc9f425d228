//! Offload example runner: builds the dispatch context once, sweeps
//! the fixed size schedule, and writes one header-less CSV. No
//! command-line arguments; every parameter is a compiled-in constant.
//!
//! Any runtime failure is fatal for the whole process: it is logged
//! and the process exits nonzero without retrying.

use anyhow::{Context as _, Result};
use tracing::{error, info};

use cachelab_opencl::report::render_records;
use cachelab_opencl::DispatchContext;

const CL_CSV: &str = "cl_speed_comparison.csv";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let ctx = DispatchContext::new().map_err(|e| {
        error!(%e, "offload setup failed");
        e
    })?;

    let records = ctx.run_sweep().map_err(|e| {
        error!(%e, "offload sweep aborted");
        e
    })?;

    std::fs::write(CL_CSV, render_records(&records))
        .with_context(|| format!("writing {CL_CSV}"))?;

    let failures = records.iter().filter(|r| !r.passed).count();
    info!(rows = records.len(), failures, "wrote {CL_CSV}");
    Ok(())
}
