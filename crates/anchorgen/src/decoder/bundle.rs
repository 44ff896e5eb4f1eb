//! Splitting a PEM bundle into annotated certificate blocks.
//!
//! Bundles look like the mkcert.org / Mozilla exports:
//!
//! ```text
//! # Issuer: CN=Example Root CA 2019,O=Example Trust Services,C=US
//! # Label: "Example Root CA 2019"
//! # SHA256 Fingerprint: 51:5A:9C:...:61:00
//! -----BEGIN CERTIFICATE-----
//! MIIBzDCCAXKgAwIBAgICEAMwCgYIKoZIzj0EAwIw...
//! -----END CERTIFICATE-----
//! ```

use anchorgen_core::{AnchorError, CertificateId, Result};
use tracing::{debug, warn};

use super::armor::{BEGIN_MARKER, END_MARKER};

/// Prefix marking an annotation line.
const ANNOTATION_PREFIX: &str = "# ";

/// Annotation key naming a certificate.
const LABEL_KEY: &str = "Label:";

/// One certificate block cut from a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    /// Position and label
    pub id: CertificateId,
    /// Annotation lines plus PEM armor, blank lines removed
    pub text: String,
    /// Raw value of the fingerprint annotation, if present
    pub declared_fingerprint: Option<String>,
}

/// Split a bundle into certificate blocks.
///
/// Blank lines are dropped and every block ends at an END marker line, so
/// each block carries the annotation lines that precede its armor.
///
/// # Errors
///
/// Returns `AnchorError::MalformedInput` if the bundle ends inside a
/// certificate (a BEGIN marker with no END marker after it).
pub fn split_bundle(bundle: &str) -> Result<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current = String::new();

    for line in bundle.lines() {
        if !line.trim().is_empty() {
            current.push_str(line);
            current.push('\n');
        }
        if line.contains(END_MARKER) {
            blocks.push(std::mem::take(&mut current));
        }
    }

    if current.contains(BEGIN_MARKER) {
        return Err(AnchorError::malformed(
            "bundle ends inside a certificate (no END CERTIFICATE marker)",
        )
        .in_certificate(format!("#{}", blocks.len())));
    }
    if !current.trim().is_empty() {
        warn!(
            lines = current.lines().count(),
            "ignoring trailing text after the last certificate"
        );
    }

    debug!(blocks = blocks.len(), "split bundle");
    Ok(blocks)
}

/// Split a bundle and read each block's label and fingerprint annotation.
///
/// `fingerprint_key` is the annotation key carrying the declared SPKI hash,
/// e.g. `SHA256 Fingerprint:`.
///
/// # Errors
///
/// Same as [`split_bundle`].
pub fn parse_entries(bundle: &str, fingerprint_key: &str) -> Result<Vec<BundleEntry>> {
    Ok(split_bundle(bundle)?
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let label = annotation(&text, LABEL_KEY).map(|l| l.trim_matches('"').to_string());
            let declared_fingerprint = annotation(&text, fingerprint_key).map(str::to_string);
            BundleEntry {
                id: CertificateId { index, label },
                text,
                declared_fingerprint,
            }
        })
        .collect())
}

/// Value of the first `# <key> <value>` line in a block.
fn annotation<'a>(block: &'a str, key: &str) -> Option<&'a str> {
    block
        .lines()
        .filter_map(|line| line.strip_prefix(ANNOTATION_PREFIX))
        .find_map(|line| line.strip_prefix(key))
        .map(str::trim)
}
