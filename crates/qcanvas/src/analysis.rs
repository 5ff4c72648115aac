//! Helpers for reading fingerprints.

use crate::error::{CanvasError, CanvasResult};

/// Parse a measurement bitstring as an unsigned integer.
pub fn bitstring_to_int(bitstring: &str) -> CanvasResult<u64> {
    u64::from_str_radix(bitstring, 2)
        .map_err(|_| CanvasError::InvalidInput(format!("'{bitstring}' is not a binary string")))
}

/// Number of `1`s in a bitstring.
pub fn hamming_weight(bitstring: &str) -> u32 {
    bitstring.bytes().filter(|&b| b == b'1').count() as u32
}

/// `count / total_shots`, or 0 when nothing was measured.
pub fn calculate_probability(count: u64, total_shots: u64) -> f64 {
    if total_shots == 0 {
        0.0
    } else {
        count as f64 / total_shots as f64
    }
}
