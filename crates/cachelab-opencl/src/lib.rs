//! Toy accelerator-offload example over OpenCL.
//!
//! Builds a doubling kernel once, then for a descending sequence of
//! buffer sizes uploads an all-ones `i32` array, dispatches the kernel
//! over a 1-D range, drains the queue, reads the result back, and
//! verifies a single fixed output index. Each iteration is recorded as
//! one header-less CSV row: `size,elapsed_seconds,passed`.
//!
//! Every stage returns [`error::ClError`]; the runtime is treated as
//! unrecoverable for the whole process, but the abort decision belongs
//! to the binary, not this library.

pub mod buffer;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod kernels;
pub mod report;

pub use buffer::{AccessMode, DeviceBuffer};
pub use device::GpuDevice;
pub use dispatch::{DispatchContext, DispatchRecord};
pub use error::{ClError, Result};
