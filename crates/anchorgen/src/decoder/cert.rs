//! X.509 certificate fields for trust anchors.
//!
//! Decoding is done by `x509-parser`; this module only picks out the byte
//! ranges an anchor is built from and enforces the extra rules the table
//! relies on (no trailing data, no repeated extensions, well-formed
//! NameConstraints and Basic Constraints).

use anchorgen_core::{AnchorError, Result, SpkiFingerprint};
use x509_parser::der_parser::asn1_rs::{FromDer, Header, Length};
use x509_parser::oid_registry::{OID_X509_EXT_BASIC_CONSTRAINTS, OID_X509_EXT_NAME_CONSTRAINTS};
use x509_parser::parse_x509_certificate;

use crate::hash::spki_fingerprint;

/// Decoded Basic Constraints extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BasicConstraints {
    /// `cA` flag
    pub ca: bool,
    /// `pathLenConstraint`, if present
    pub path_len: Option<u32>,
}

/// The trust-anchor-relevant fields of one certificate, borrowed from its DER.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificateFields<'a> {
    /// Subject `Name` content octets
    pub subject_dn: &'a [u8],
    /// Complete SubjectPublicKeyInfo TLV
    pub spki: &'a [u8],
    /// NameConstraints extension value (a complete SEQUENCE TLV)
    pub name_constraints: Option<&'a [u8]>,
    /// Basic Constraints extension, if present
    pub basic_constraints: Option<BasicConstraints>,
}

impl CertificateFields<'_> {
    /// Returns true if Basic Constraints marks the certificate as a CA
    #[must_use]
    pub fn is_ca(&self) -> bool {
        self.basic_constraints.is_some_and(|bc| bc.ca)
    }

    /// `pathLenConstraint`, if Basic Constraints carries one
    #[must_use]
    pub fn path_len(&self) -> Option<u32> {
        self.basic_constraints.and_then(|bc| bc.path_len)
    }
}

/// Decode a DER certificate down to the fields a trust anchor needs.
///
/// # Errors
///
/// Returns `AnchorError::CertificateParse` if the input is not exactly one
/// X.509 certificate, if an extension appears twice, or if the Basic
/// Constraints or NameConstraints extension cannot be decoded.
pub fn parse_certificate(der: &[u8]) -> Result<CertificateFields<'_>> {
    let (rest, cert) = parse_x509_certificate(der)
        .map_err(|e| AnchorError::parse(format!("invalid X.509 certificate: {e}")))?;
    if !rest.is_empty() {
        return Err(AnchorError::parse(format!(
            "{} unexpected trailing octets after the certificate",
            rest.len()
        )));
    }

    cert.extensions_map()
        .map_err(|e| AnchorError::parse(format!("invalid extensions: {e}")))?;

    let mut name_constraints = None;
    for ext in cert.extensions() {
        if ext.oid != OID_X509_EXT_NAME_CONSTRAINTS && ext.oid != OID_X509_EXT_BASIC_CONSTRAINTS {
            continue;
        }
        if let Some(e) = ext.parsed_extension().error() {
            return Err(AnchorError::parse(format!(
                "extension {} could not be decoded: {e}",
                ext.oid.to_id_string()
            )));
        }
        if ext.oid == OID_X509_EXT_NAME_CONSTRAINTS {
            name_constraints = Some(ext.value);
        }
    }

    let basic_constraints = cert
        .basic_constraints()
        .map_err(|e| AnchorError::parse(format!("invalid basicConstraints: {e}")))?
        .map(|bc| BasicConstraints {
            ca: bc.value.ca,
            path_len: bc.value.path_len_constraint,
        });

    Ok(CertificateFields {
        subject_dn: der_value(cert.subject.as_raw())?,
        spki: cert.subject_pki.raw,
        name_constraints,
        basic_constraints,
    })
}

/// Subject name, SPKI and embedded name constraints of a DER certificate.
///
/// Absent name constraints are `None`, not an error.
///
/// # Errors
///
/// Returns `AnchorError::CertificateParse` on structurally invalid input.
pub fn extract_fields(der: &[u8]) -> Result<(Vec<u8>, Vec<u8>, Option<Vec<u8>>)> {
    let fields = parse_certificate(der)?;
    Ok((
        fields.subject_dn.to_vec(),
        fields.spki.to_vec(),
        fields.name_constraints.map(<[u8]>::to_vec),
    ))
}

/// SHA-256 over the DER SubjectPublicKeyInfo of a certificate.
///
/// Hashing the key structure rather than the whole certificate makes two
/// certificates for one key resolve to the same anchor identity.
///
/// # Errors
///
/// Returns `AnchorError::CertificateParse` on structurally invalid input.
pub fn compute_spki_hash(der: &[u8]) -> Result<SpkiFingerprint> {
    parse_certificate(der).map(|fields| spki_fingerprint(fields.spki))
}

/// Content octets of one complete DER element.
///
/// # Errors
///
/// Returns `AnchorError::CertificateParse` if the header is invalid or the
/// length does not cover exactly the rest of `tlv`.
pub fn der_value(tlv: &[u8]) -> Result<&[u8]> {
    let (content, header) = Header::from_der(tlv)
        .map_err(|e| AnchorError::parse(format!("invalid DER header: {e}")))?;
    match header.length() {
        Length::Definite(len) if len == content.len() => Ok(content),
        Length::Definite(len) => Err(AnchorError::parse(format!(
            "DER element declares {len} content octets, {} present",
            content.len()
        ))),
        Length::Indefinite => Err(AnchorError::parse("indefinite length is not allowed in DER")),
    }
}
