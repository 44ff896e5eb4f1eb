use std::fmt::Display;

use thiserror::Error;

/// Result type alias for trust anchor table operations
pub type Result<T> = std::result::Result<T, AnchorError>;

/// Placeholder used until the failing certificate is known.
const UNIDENTIFIED: &str = "<unidentified>";

/// Errors that abort a trust anchor table build.
///
/// Every variant is fatal: a table is only ever produced when all input
/// certificates pass, so callers never see a partial result.
#[derive(Error, Debug)]
pub enum AnchorError {
    /// PEM framing absent, base64 invalid, or a required annotation missing
    #[error("malformed input in certificate {cert}: {reason}")]
    MalformedInput {
        /// Which certificate in the bundle
        cert: String,
        /// What was wrong with the text
        reason: String,
    },

    /// DER structure does not have the expected ASN.1 shape
    #[error("certificate {cert} could not be parsed: {reason}")]
    CertificateParse {
        /// Which certificate in the bundle
        cert: String,
        /// What was wrong with the structure
        reason: String,
    },

    /// Declared SPKI hash disagrees with the computed one
    #[error(
        "integrity check failed for certificate {cert}: declared SPKI hash {declared}, computed {computed}"
    )]
    Integrity {
        /// Which certificate in the bundle
        cert: String,
        /// Hash claimed by the bundle annotation
        declared: String,
        /// Hash computed over the certificate's SPKI
        computed: String,
    },

    /// Two certificates share a public key
    #[error(
        "duplicate trust anchor {fingerprint}: certificate {cert} shares its public key with certificate {previous}"
    )]
    DuplicateAnchor {
        /// SPKI hash both certificates resolve to
        fingerprint: String,
        /// The repeating certificate
        cert: String,
        /// The certificate seen first
        previous: String,
    },

    /// Certificate lacks Basic Constraints `cA = TRUE` while CA certificates are required
    #[error("certificate {cert} is not a CA certificate")]
    NotCertificateAuthority {
        /// Which certificate in the bundle
        cert: String,
    },

    /// Building a DER structure failed
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Configuration is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnchorError {
    /// A malformed-input error not yet attributed to a certificate.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            cert: UNIDENTIFIED.to_string(),
            reason: reason.into(),
        }
    }

    /// A parse error not yet attributed to a certificate.
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::CertificateParse {
            cert: UNIDENTIFIED.to_string(),
            reason: reason.into(),
        }
    }

    /// Attribute a decoding error to the certificate it came from.
    ///
    /// Only `MalformedInput` and `CertificateParse` are rewritten; the other
    /// variants already carry their certificate.
    #[must_use]
    pub fn in_certificate(self, id: impl Display) -> Self {
        match self {
            Self::MalformedInput { reason, .. } => Self::MalformedInput {
                cert: id.to_string(),
                reason,
            },
            Self::CertificateParse { reason, .. } => Self::CertificateParse {
                cert: id.to_string(),
                reason,
            },
            other => other,
        }
    }

    /// Returns true if the bundle content itself is suspect (tampering or a
    /// repeated key), as opposed to being unreadable
    #[must_use]
    pub const fn is_integrity_failure(&self) -> bool {
        matches!(self, Self::Integrity { .. } | Self::DuplicateAnchor { .. })
    }

    /// Returns the certificate this error was raised for, if any
    #[must_use]
    pub fn certificate(&self) -> Option<&str> {
        match self {
            Self::MalformedInput { cert, .. }
            | Self::CertificateParse { cert, .. }
            | Self::Integrity { cert, .. }
            | Self::DuplicateAnchor { cert, .. }
            | Self::NotCertificateAuthority { cert } => {
                (cert != UNIDENTIFIED).then_some(cert.as_str())
            }
            _ => None,
        }
    }
}
