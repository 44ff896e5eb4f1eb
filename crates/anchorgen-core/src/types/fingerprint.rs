use serde::{Serialize, Serializer};
use std::fmt;

/// SHA-256 digest of a DER-encoded SubjectPublicKeyInfo.
///
/// Ordering compares the raw digest bytes as unsigned values, which is the
/// order anchors are emitted in.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SpkiFingerprint([u8; 32]);

impl SpkiFingerprint {
    /// Digest length in bytes
    pub const LEN: usize = 32;

    /// Wrap a raw digest
    #[must_use]
    pub const fn new(digest: [u8; 32]) -> Self {
        Self(digest)
    }

    /// Parse a hex digest as found in bundle annotations.
    ///
    /// Colons, surrounding whitespace and letter case are ignored, so both
    /// `AB:CD:...` and `abcd...` are accepted. Returns `None` unless exactly
    /// 64 hex digits remain.
    #[must_use]
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits: String = text.trim().chars().filter(|c| *c != ':').collect();
        if digits.len() != Self::LEN * 2 {
            return None;
        }
        let mut digest = [0u8; 32];
        hex::decode_to_slice(&digits, &mut digest).ok()?;
        Some(Self(digest))
    }

    /// Raw digest bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex, no separators
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for SpkiFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for SpkiFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpkiFingerprint({})", self.to_hex())
    }
}

impl Serialize for SpkiFingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
