//! Device buffers with declared access modes.

use std::marker::PhantomData;

use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::memory::{
    Buffer, ClMem, CL_MEM_READ_ONLY, CL_MEM_READ_WRITE, CL_MEM_WRITE_ONLY,
};
use opencl3::types::{cl_mem, CL_BLOCKING};
use tracing::debug;

use crate::error::{ClError, Result};

/// Declared host/device access pattern of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

fn mode_to_flags(mode: AccessMode) -> u64 {
    match mode {
        AccessMode::ReadOnly => CL_MEM_READ_ONLY,
        AccessMode::WriteOnly => CL_MEM_WRITE_ONLY,
        AccessMode::ReadWrite => CL_MEM_READ_WRITE,
    }
}

/// A typed device buffer: opaque handle plus element length.
///
/// The underlying allocation is released when the buffer is dropped,
/// which the dispatch loop relies on to free all per-iteration buffers
/// before the next size.
pub struct DeviceBuffer<T: Copy + 'static> {
    inner: Buffer<T>,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: Copy + 'static> std::fmt::Debug for DeviceBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceBuffer")
            .field("len", &self.len)
            .field("elem_size", &std::mem::size_of::<T>())
            .finish()
    }
}

impl<T: Copy + 'static> DeviceBuffer<T> {
    /// Allocate a device buffer of `len` elements.
    pub fn new(context: &Context, len: usize, mode: AccessMode) -> Result<Self> {
        let byte_size = len * std::mem::size_of::<T>();
        let inner = unsafe {
            Buffer::<T>::create(context, mode_to_flags(mode), len, std::ptr::null_mut())
                .map_err(|e| ClError::BufferAlloc {
                    bytes: byte_size,
                    reason: e.to_string(),
                })?
        };
        debug!("device buffer allocated: {} elems, {} bytes", len, byte_size);
        Ok(Self { inner, len, _marker: PhantomData })
    }

    /// Number of elements the buffer holds.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The raw memory handle, for kernel-argument binding.
    pub fn raw(&self) -> cl_mem {
        self.inner.get()
    }

    /// Upload host data to the buffer (blocking).
    pub fn write(&mut self, queue: &CommandQueue, data: &[T]) -> Result<()> {
        if data.len() > self.len {
            return Err(ClError::Transfer(format!(
                "source ({}) exceeds buffer capacity ({})",
                data.len(),
                self.len
            )));
        }
        unsafe {
            queue
                .enqueue_write_buffer(&mut self.inner, CL_BLOCKING, 0, data, &[])
                .map_err(|e| ClError::Transfer(format!("write: {e}")))?;
        }
        Ok(())
    }

    /// Download device data from the buffer (blocking).
    pub fn read(&self, queue: &CommandQueue, dst: &mut [T]) -> Result<()> {
        if dst.len() > self.len {
            return Err(ClError::Transfer(format!(
                "destination ({}) exceeds buffer capacity ({})",
                dst.len(),
                self.len
            )));
        }
        unsafe {
            queue
                .enqueue_read_buffer(&self.inner, CL_BLOCKING, 0, dst, &[])
                .map_err(|e| ClError::Transfer(format!("read: {e}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_flags_are_distinct() {
        let flags = [
            mode_to_flags(AccessMode::ReadOnly),
            mode_to_flags(AccessMode::WriteOnly),
            mode_to_flags(AccessMode::ReadWrite),
        ];
        assert_ne!(flags[0], flags[1]);
        assert_ne!(flags[1], flags[2]);
        assert_ne!(flags[0], flags[2]);
    }

    #[test]
    fn read_only_maps_to_cl_flag() {
        assert_eq!(mode_to_flags(AccessMode::ReadOnly), CL_MEM_READ_ONLY);
        assert_eq!(mode_to_flags(AccessMode::WriteOnly), CL_MEM_WRITE_ONLY);
    }
}
