//! The one-shot offload dispatch sequence.
//!
//! [`DispatchContext::new`] runs the linear setup state machine once:
//! device discovery, context, queue, program build, kernel resolution.
//! The context is then reused for every buffer size; only the three
//! per-iteration device buffers (input array, length scalar, output
//! array) are recreated, and they are dropped before the next size.
//! Context, queue, program, and kernel are released exactly once when
//! the context itself is dropped.

use std::time::{Duration, Instant};

use opencl3::command_queue::{CommandQueue, CL_QUEUE_PROFILING_ENABLE};
use opencl3::context::Context;
use opencl3::kernel::{ExecuteKernel, Kernel};
use opencl3::program::Program;
use tracing::{debug, info};

use crate::buffer::{AccessMode, DeviceBuffer};
use crate::device::GpuDevice;
use crate::error::{truncate_log, ClError, Result};
use crate::kernels::{DOUBLE_ELEMS_ENTRY, DOUBLE_ELEMS_SRC};

/// First buffer size of the sweep; subsequent sizes halve until 0.
pub const START_SIZE: usize = 4098;
/// Every input element starts at this value.
pub const FILL_VALUE: i32 = 1;
/// The single output index checked for correctness.
pub const VERIFY_INDEX: usize = 5;
/// Expected value at [`VERIFY_INDEX`] after a correct run.
pub const EXPECTED: i32 = FILL_VALUE * 2;

/// Outcome of one dispatch iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchRecord {
    pub size: usize,
    pub elapsed: Duration,
    pub passed: bool,
}

/// The one-time-built program/kernel/queue bundle.
pub struct DispatchContext {
    device: GpuDevice,
    context: Context,
    queue: CommandQueue,
    #[allow(dead_code)]
    program: Program,
    kernel: Kernel,
}

impl std::fmt::Debug for DispatchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchContext")
            .field("device", &self.device.device_name)
            .field("platform", &self.device.platform_name)
            .finish()
    }
}

impl DispatchContext {
    /// Run the setup state machine: discovery, context, queue, build,
    /// kernel resolution. Any failure is final; nothing is retried.
    pub fn new() -> Result<Self> {
        let device = GpuDevice::first_gpu()?;

        let context = Context::from_device(&device.device)
            .map_err(|e| ClError::Context(e.to_string()))?;

        let queue =
            CommandQueue::create_default_with_properties(&context, CL_QUEUE_PROFILING_ENABLE, 0)
                .map_err(|e| ClError::Queue(e.to_string()))?;

        let program = Program::create_and_build_from_source(&context, DOUBLE_ELEMS_SRC, "")
            .map_err(|log| ClError::ProgramBuild { log: truncate_log(&log.to_string()) })?;

        let kernel = Kernel::create(&program, DOUBLE_ELEMS_ENTRY).map_err(|e| ClError::Kernel {
            name: DOUBLE_ELEMS_ENTRY.to_string(),
            reason: e.to_string(),
        })?;

        info!(device = %device.device_name, "offload context ready");
        Ok(Self { device, context, queue, program, kernel })
    }

    /// Dispatch the doubling kernel over a buffer of `size` elements
    /// and verify one output index.
    ///
    /// Elapsed time covers enqueue, queue drain, and read-back. A
    /// verification mismatch is a recorded result, not an error;
    /// `size <= VERIFY_INDEX` is a defined failure rather than an
    /// out-of-bounds read.
    pub fn run_size(&self, size: usize) -> Result<DispatchRecord> {
        let input = vec![FILL_VALUE; size];

        let mut input_buf = DeviceBuffer::<i32>::new(&self.context, size, AccessMode::ReadOnly)?;
        let mut len_buf = DeviceBuffer::<i64>::new(&self.context, 1, AccessMode::ReadOnly)?;
        let output_buf = DeviceBuffer::<i32>::new(&self.context, size, AccessMode::WriteOnly)?;

        input_buf.write(&self.queue, &input)?;
        len_buf.write(&self.queue, &[size as i64])?;

        if let Some(wg) = self.device.max_work_group_size() {
            // Queried for parity with the historical sequence; the
            // launch deliberately leaves the local size to the driver.
            debug!(max_work_group_size = wg, "device work-group size (unused)");
        }

        let start = Instant::now();

        // One work item per element; the kernel guards against any
        // driver round-up past the array end.
        unsafe {
            let mut exec = ExecuteKernel::new(&self.kernel);
            exec.set_arg(&input_buf.raw())
                .set_arg(&len_buf.raw())
                .set_arg(&output_buf.raw())
                .set_global_work_sizes(&[size]);
            exec.enqueue_nd_range(&self.queue)
                .map_err(|e| ClError::Enqueue(e.to_string()))?;
        }

        self.queue.finish().map_err(|e| ClError::Drain(e.to_string()))?;

        let mut output = vec![0i32; size];
        output_buf.read(&self.queue, &mut output)?;

        let elapsed = start.elapsed();
        let passed = verify(&output);
        debug!(size, passed, "dispatch iteration complete");

        Ok(DispatchRecord { size, elapsed, passed })
    }

    /// Run the full sweep from [`START_SIZE`] down, one record per size.
    pub fn run_sweep(&self) -> Result<Vec<DispatchRecord>> {
        let sizes = sweep_sizes(START_SIZE);
        let mut records = Vec::with_capacity(sizes.len());
        for size in sizes {
            let record = self.run_size(size)?;
            info!(
                size,
                passed = record.passed,
                elapsed_s = record.elapsed.as_secs_f64(),
                "offload size done"
            );
            records.push(record);
        }
        Ok(records)
    }
}

/// The descending size schedule: `start`, halving, stopping before 0.
///
/// A zero-length round-trip is skipped by construction; the loop ends
/// once the size underflows to 0.
pub fn sweep_sizes(start: usize) -> Vec<usize> {
    let mut sizes = Vec::new();
    let mut size = start;
    while size > 0 {
        sizes.push(size);
        size >>= 1;
    }
    sizes
}

/// Pass iff the output holds [`EXPECTED`] at [`VERIFY_INDEX`].
///
/// Buffers of `VERIFY_INDEX` or fewer elements fail by definition
/// instead of reading out of bounds.
pub fn verify(output: &[i32]) -> bool {
    output.get(VERIFY_INDEX) == Some(&EXPECTED)
}
