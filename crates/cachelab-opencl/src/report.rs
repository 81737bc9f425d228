//! Header-less CSV output for dispatch records.

use std::fmt::Write as _;

use crate::dispatch::DispatchRecord;

/// Render records as `size,elapsed_seconds,passed` lines, pass/fail
/// encoded as 1/0, no header.
pub fn render_records(records: &[DispatchRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = writeln!(
            out,
            "{},{:.6},{}",
            record.size,
            record.elapsed.as_secs_f64(),
            u8::from(record.passed)
        );
    }
    out
}
