//! Error types for the offload dispatch sequence.
//!
//! One variant per stage of the linear state machine. There is no
//! retry policy: any runtime failure is unrecoverable for the process,
//! but the library only reports it; the binary decides to abort.

use thiserror::Error;

/// Compiler build logs are bounded to this many bytes before being
/// attached to an error.
pub const BUILD_LOG_CAP: usize = 2048;

/// Errors from the OpenCL offload stages.
#[derive(Debug, Error)]
pub enum ClError {
    /// No OpenCL platform is installed.
    #[error("no OpenCL platform found")]
    NoPlatform,
    /// Platforms exist but none exposes a usable GPU device.
    #[error("no OpenCL GPU device found: {reason}")]
    NoDevice { reason: String },
    /// Context creation failed for the selected device.
    #[error("context creation failed: {0}")]
    Context(String),
    /// Command queue creation failed.
    #[error("command queue creation failed: {0}")]
    Queue(String),
    /// Kernel source failed to compile; `log` holds the bounded
    /// compiler diagnostic.
    #[error("program build failed:\n{log}")]
    ProgramBuild { log: String },
    /// The named kernel entry point could not be resolved.
    #[error("kernel '{name}' not found: {reason}")]
    Kernel { name: String, reason: String },
    /// Device buffer allocation failed.
    #[error("buffer allocation ({bytes} bytes) failed: {reason}")]
    BufferAlloc { bytes: usize, reason: String },
    /// Host-to-device or device-to-host copy failed.
    #[error("data transfer failed: {0}")]
    Transfer(String),
    /// Kernel enqueue was rejected.
    #[error("kernel enqueue failed: {0}")]
    Enqueue(String),
    /// Blocking queue drain failed.
    #[error("queue drain failed: {0}")]
    Drain(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ClError>;

/// Bound a compiler log to [`BUILD_LOG_CAP`] bytes on a char boundary.
pub fn truncate_log(log: &str) -> String {
    if log.len() <= BUILD_LOG_CAP {
        return log.to_string();
    }
    let mut end = BUILD_LOG_CAP;
    while !log.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &log[..end])
}
