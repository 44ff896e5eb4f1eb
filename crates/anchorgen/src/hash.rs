//! SHA-256 hashing via `ring::digest`.

use anchorgen_core::SpkiFingerprint;
use ring::digest::{digest, Context, SHA256};

/// Compute SHA-256 of raw bytes, lowercase hex-encoded.
#[must_use]
pub fn sha256_bytes(data: &[u8]) -> String {
    hex::encode(digest(&SHA256, data).as_ref())
}

/// Fingerprint a DER-encoded SubjectPublicKeyInfo.
#[must_use]
pub fn spki_fingerprint(spki: &[u8]) -> SpkiFingerprint {
    let mut out = [0u8; SpkiFingerprint::LEN];
    out.copy_from_slice(digest(&SHA256, spki).as_ref());
    SpkiFingerprint::new(out)
}

/// Incremental SHA-256 over length-prefixed fields.
///
/// Prefixing every field with its length keeps `("ab", "c")` and
/// `("a", "bc")` from hashing the same.
pub struct FieldHasher {
    context: Context,
}

impl FieldHasher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            context: Context::new(&SHA256),
        }
    }

    /// Absorb one field.
    pub fn field(&mut self, data: &[u8]) {
        self.context.update(&(data.len() as u64).to_be_bytes());
        self.context.update(data);
    }

    /// Absorb a bare marker byte.
    pub fn marker(&mut self, byte: u8) {
        self.context.update(&[byte]);
    }

    /// Lowercase hex digest.
    #[must_use]
    pub fn finish(self) -> String {
        hex::encode(self.context.finish().as_ref())
    }
}

impl Default for FieldHasher {
    fn default() -> Self {
        Self::new()
    }
}
