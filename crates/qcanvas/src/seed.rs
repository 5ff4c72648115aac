//! Name to seed derivation.

use sha2::{Digest, Sha256};

use crate::error::{CanvasError, CanvasResult};

/// Canonical form of a name: surrounding whitespace removed, lowercased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Derive the 32-bit seed for `name`.
///
/// The seed is the first four bytes, big-endian, of the SHA-256 digest of the
/// normalized name, so `" Alice "`, `"alice"` and `"ALICE"` share a seed.
pub fn derive_seed(name: &str) -> CanvasResult<u32> {
    let normalized = normalize_name(name);
    if normalized.is_empty() {
        return Err(CanvasError::InvalidInput(
            "name must contain at least one non-whitespace character".into(),
        ));
    }
    let digest = Sha256::digest(normalized.as_bytes());
    Ok(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}
