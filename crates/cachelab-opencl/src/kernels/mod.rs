//! Embedded OpenCL kernel sources.
//!
//! Sources are compiled at runtime by the OpenCL driver; each constant
//! embeds the `.cl` text into the binary so no filesystem access is
//! needed at runtime.

/// Element-wise doubling over a 1-D range, guarded by the length
/// scalar so launches rounded up past the array end stay in bounds.
pub const DOUBLE_ELEMS_SRC: &str = include_str!("double_elems.cl");

/// Entry point name inside [`DOUBLE_ELEMS_SRC`].
pub const DOUBLE_ELEMS_ENTRY: &str = "double_elems";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_declares_the_entry_point() {
        assert!(DOUBLE_ELEMS_SRC.contains(&format!("__kernel void {DOUBLE_ELEMS_ENTRY}")));
    }

    #[test]
    fn source_takes_three_buffer_arguments() {
        assert!(DOUBLE_ELEMS_SRC.contains("__global const int *input"));
        assert!(DOUBLE_ELEMS_SRC.contains("__global const long *len"));
        assert!(DOUBLE_ELEMS_SRC.contains("__global int *output"));
    }

    #[test]
    fn source_is_guarded_one_item_per_element() {
        assert!(DOUBLE_ELEMS_SRC.contains("get_global_id(0)"));
        assert!(DOUBLE_ELEMS_SRC.contains("< *len"));
    }
}
