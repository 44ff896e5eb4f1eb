use std::fmt;

use super::SpkiFingerprint;

/// Position and label of a certificate within its source bundle.
///
/// Used to name the offending certificate in errors and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateId {
    /// Zero-based position in the bundle
    pub index: usize,
    /// Value of the `# Label:` annotation, quotes removed
    pub label: Option<String>,
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "#{} \"{}\"", self.index, label),
            None => write!(f, "#{}", self.index),
        }
    }
}

/// One decoded input certificate.
///
/// Created once per run from the bundle and consumed by the assembler.
#[derive(Debug, Clone)]
pub struct CertificateRecord {
    /// Where the certificate came from
    pub id: CertificateId,
    /// Original text block, annotation comments included
    pub raw_pem: String,
    /// Decoded certificate
    pub der_bytes: Vec<u8>,
    /// Value of the subject `Name` (RDN sets without the outer SEQUENCE header)
    pub subject_dn: Vec<u8>,
    /// Complete SubjectPublicKeyInfo TLV
    pub spki_bytes: Vec<u8>,
    /// NameConstraints as carried by the certificate itself
    pub embedded_name_constraints: Option<Vec<u8>>,
    /// Basic Constraints `cA` flag (false when the extension is absent)
    pub is_ca: bool,
    /// SPKI hash claimed by the bundle annotation
    pub declared_spki_hash: SpkiFingerprint,
}
