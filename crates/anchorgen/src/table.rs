//! Table digest and serialization.

use anchorgen_core::{AnchorError, AnchorTable, Result, TrustAnchor};

use crate::decoder::der_value;
use crate::hash::FieldHasher;

const CONSTRAINED: u8 = 1;
const UNCONSTRAINED: u8 = 0;

/// Compute a digest identifying the exact content and order of a table.
///
/// Two runs over the same bundle must produce the same digest; comparing
/// digests is the cheap way to check a rebuild. Each anchor contributes its
/// subject, SPKI and name constraints as length-prefixed fields, with a
/// marker byte distinguishing absent constraints from empty ones.
#[must_use]
pub fn table_digest(table: &AnchorTable) -> String {
    let mut hasher = FieldHasher::new();
    hasher.field(&(table.len() as u64).to_be_bytes());
    for anchor in table {
        hasher.field(&anchor.subject);
        hasher.field(&anchor.spki);
        match &anchor.name_constraints {
            Some(nc) => {
                hasher.marker(CONSTRAINED);
                hasher.field(nc);
            }
            None => hasher.marker(UNCONSTRAINED),
        }
    }
    hasher.finish()
}

/// SubjectPublicKeyInfo content octets of `anchor`, without the outer
/// SEQUENCE header.
///
/// This is the form webpki expects alongside the subject value.
///
/// # Errors
///
/// Returns `AnchorError::CertificateParse` if `anchor.spki` is not one
/// complete DER element.
pub fn spki_value(anchor: &TrustAnchor) -> Result<&[u8]> {
    der_value(&anchor.spki)
}

/// Pretty-printed JSON array of the table's anchors.
pub fn to_json(table: &AnchorTable) -> Result<String> {
    serde_json::to_string_pretty(table).map_err(|e| AnchorError::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorgen_core::SpkiFingerprint;

    fn anchor(seed: u8, name_constraints: Option<Vec<u8>>) -> TrustAnchor {
        TrustAnchor {
            subject: vec![0x31, seed],
            spki: vec![0x30, seed],
            name_constraints,
            provenance: String::new(),
            fingerprint: SpkiFingerprint::new([seed; 32]),
        }
    }

    #[test]
    fn digest_is_stable() {
        let table = AnchorTable::new(vec![anchor(1, None), anchor(2, Some(vec![0x30, 0x00]))]);
        assert_eq!(table_digest(&table), table_digest(&table.clone()));
        assert_eq!(table_digest(&table).len(), 64);
    }

    #[test]
    fn digest_ignores_provenance() {
        let mut annotated = anchor(1, None);
        annotated.provenance = "# Label: \"x\"".into();
        assert_eq!(
            table_digest(&AnchorTable::new(vec![anchor(1, None)])),
            table_digest(&AnchorTable::new(vec![annotated]))
        );
    }

    #[test]
    fn digest_distinguishes_absent_from_empty_constraints() {
        let absent = AnchorTable::new(vec![anchor(1, None)]);
        let empty = AnchorTable::new(vec![anchor(1, Some(Vec::new()))]);
        assert_ne!(table_digest(&absent), table_digest(&empty));
    }

    #[test]
    fn digest_covers_every_anchor() {
        let one = AnchorTable::new(vec![anchor(1, None)]);
        let two = AnchorTable::new(vec![anchor(1, None), anchor(2, None)]);
        assert_ne!(table_digest(&one), table_digest(&two));
        assert_ne!(table_digest(&one), table_digest(&AnchorTable::default()));
    }

    #[test]
    fn json_lists_anchors_in_order() {
        let table = AnchorTable::new(vec![anchor(2, None), anchor(1, Some(vec![0x30, 0x00]))]);
        let value: serde_json::Value = serde_json::from_str(&to_json(&table).unwrap()).unwrap();
        let anchors = value.as_array().unwrap();
        assert_eq!(anchors[0]["subject"], "3101");
        assert_eq!(anchors[0]["name_constraints"], "3000");
        assert_eq!(anchors[1]["spki"], "3002");
        assert!(anchors[1]["name_constraints"].is_null());
    }

    #[test]
    fn spki_value_drops_the_sequence_header() {
        let mut key = anchor(1, None);
        key.spki = vec![0x30, 0x02, 0x05, 0x00];
        assert_eq!(spki_value(&key).unwrap(), &[0x05, 0x00]);

        // the placeholder spki [0x30, 0x01] claims a content octet it lacks
        assert!(matches!(
            spki_value(&anchor(1, None)),
            Err(AnchorError::CertificateParse { .. })
        ));
    }
}
