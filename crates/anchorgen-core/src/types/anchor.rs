use serde::{Serialize, Serializer};

use super::SpkiFingerprint;

/// A finalized trust anchor as consumed by the verification engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrustAnchor {
    /// Subject `Name` value bytes
    #[serde(serialize_with = "hex_bytes")]
    pub subject: Vec<u8>,

    /// Complete SubjectPublicKeyInfo TLV, header included.
    ///
    /// Unlike `subject`, this is not the bare value: the pin hash is taken
    /// over the whole TLV. Validators that want the content octets (as
    /// webpki's `TrustAnchor::spki` does) strip the header first; see
    /// `anchorgen::spki_value`.
    #[serde(serialize_with = "hex_bytes")]
    pub spki: Vec<u8>,

    /// Resolved NameConstraints (override, embedded, or absent)
    #[serde(serialize_with = "hex_bytes_opt")]
    pub name_constraints: Option<Vec<u8>>,

    /// Annotation lines and PEM armor the anchor was built from
    pub provenance: String,

    /// Sort and dedup key; not part of the emitted anchor
    #[serde(skip)]
    pub fingerprint: SpkiFingerprint,
}

impl TrustAnchor {
    /// Render the provenance as a block comment.
    ///
    /// Annotation prefixes (`# `) are stripped and every line is prefixed
    /// with ` * `.
    #[must_use]
    pub fn provenance_comment(&self) -> String {
        let mut out = String::from("/*\n");
        for line in self.provenance.lines() {
            let line = line.strip_prefix("# ").unwrap_or(line);
            out.push_str(" * ");
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(" */");
        out
    }
}

/// The ordered, deduplicated output of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnchorTable {
    anchors: Vec<TrustAnchor>,
}

impl AnchorTable {
    /// Build a table, ordering anchors by SPKI fingerprint.
    ///
    /// Uniqueness is the caller's responsibility.
    #[must_use]
    pub fn new(mut anchors: Vec<TrustAnchor>) -> Self {
        anchors.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint));
        Self { anchors }
    }

    /// Number of anchors
    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Returns true if the table holds no anchors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Anchors in emission order
    pub fn iter(&self) -> std::slice::Iter<'_, TrustAnchor> {
        self.anchors.iter()
    }

    /// Anchors in emission order
    #[must_use]
    pub fn as_slice(&self) -> &[TrustAnchor] {
        &self.anchors
    }

    /// SPKI fingerprints in emission order
    #[must_use]
    pub fn fingerprints(&self) -> Vec<SpkiFingerprint> {
        self.anchors.iter().map(|a| a.fingerprint).collect()
    }
}

impl<'a> IntoIterator for &'a AnchorTable {
    type Item = &'a TrustAnchor;
    type IntoIter = std::slice::Iter<'a, TrustAnchor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn hex_bytes<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

#[allow(clippy::ref_option)]
fn hex_bytes_opt<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
    match bytes {
        Some(b) => serializer.serialize_some(&hex::encode(b)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(first_byte: u8, name_constraints: Option<Vec<u8>>) -> TrustAnchor {
        let mut digest = [0u8; 32];
        digest[0] = first_byte;
        TrustAnchor {
            subject: vec![0x31, 0x00],
            spki: vec![0x30, 0x00],
            name_constraints,
            provenance: "# Label: \"Test\"\n-----BEGIN CERTIFICATE-----".into(),
            fingerprint: SpkiFingerprint::new(digest),
        }
    }

    #[test]
    fn table_orders_by_fingerprint() {
        let table = AnchorTable::new(vec![anchor(0xf0, None), anchor(0x01, None), anchor(0x80, None)]);
        let firsts: Vec<u8> = table.iter().map(|a| a.fingerprint.as_bytes()[0]).collect();
        assert_eq!(firsts, vec![0x01, 0x80, 0xf0]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn provenance_comment_strips_annotation_prefix() {
        let comment = anchor(0, None).provenance_comment();
        assert_eq!(
            comment,
            "/*\n * Label: \"Test\"\n * -----BEGIN CERTIFICATE-----\n */"
        );
    }

    #[test]
    fn json_omits_fingerprint_and_keeps_absent_constraints_null() {
        let json = serde_json::to_value(anchor(0x42, None)).unwrap();
        assert_eq!(json["subject"], "3100");
        assert_eq!(json["spki"], "3000");
        assert!(json["name_constraints"].is_null());
        assert!(json.get("fingerprint").is_none());

        let constrained = serde_json::to_value(anchor(0x42, Some(vec![0x30, 0x00]))).unwrap();
        assert_eq!(constrained["name_constraints"], "3000");
    }

    #[test]
    fn table_serializes_as_array() {
        let table = AnchorTable::new(vec![anchor(2, None), anchor(1, None)]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(2));
    }
}
