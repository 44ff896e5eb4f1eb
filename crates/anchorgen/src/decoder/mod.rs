//! Certificate decoding: bundle splitting, PEM armor, DER field extraction.

mod armor;
mod bundle;
mod cert;

pub use armor::{decode_pem_block, BEGIN_MARKER, END_MARKER};
pub use bundle::{parse_entries, split_bundle, BundleEntry};
pub use cert::{
    compute_spki_hash, der_value, extract_fields, parse_certificate, BasicConstraints,
    CertificateFields,
};

use anchorgen_core::{AnchorError, CertificateRecord, Result, SpkiFingerprint};
use tracing::debug;

/// Decode one bundle entry into a [`CertificateRecord`].
///
/// The declared fingerprint is parsed here but not yet compared with the
/// key; that check belongs to the assembler.
///
/// # Errors
///
/// Returns `AnchorError::MalformedInput` if the fingerprint annotation is
/// missing or not a SHA-256 hex digest, or if the PEM block is malformed.
/// Returns `AnchorError::CertificateParse` if the DER is structurally invalid.
/// Either error names the entry's certificate.
pub fn decode_entry(entry: &BundleEntry) -> Result<CertificateRecord> {
    decode_entry_inner(entry).map_err(|e| e.in_certificate(&entry.id))
}

fn decode_entry_inner(entry: &BundleEntry) -> Result<CertificateRecord> {
    let declared = entry
        .declared_fingerprint
        .as_deref()
        .ok_or_else(|| AnchorError::malformed("missing SHA-256 fingerprint annotation"))?;
    let declared_spki_hash = SpkiFingerprint::from_hex(declared).ok_or_else(|| {
        AnchorError::malformed(format!("fingerprint annotation {declared:?} is not a SHA-256 digest"))
    })?;

    let der_bytes = decode_pem_block(&entry.text)?;
    let fields = parse_certificate(&der_bytes)?;

    debug!(
        cert = %entry.id,
        ca = fields.is_ca(),
        path_len = ?fields.path_len(),
        embedded_name_constraints = fields.name_constraints.is_some(),
        "decoded certificate"
    );

    Ok(CertificateRecord {
        id: entry.id.clone(),
        raw_pem: entry.text.clone(),
        subject_dn: fields.subject_dn.to_vec(),
        spki_bytes: fields.spki.to_vec(),
        embedded_name_constraints: fields.name_constraints.map(<[u8]>::to_vec),
        is_ca: fields.is_ca(),
        declared_spki_hash,
        der_bytes,
    })
}
