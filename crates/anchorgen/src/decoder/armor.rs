//! PEM armor removal.

use anchorgen_core::{AnchorError, Result};

/// Opening armor line of a certificate block.
pub const BEGIN_MARKER: &str = "-----BEGIN CERTIFICATE-----";

/// Closing armor line of a certificate block.
pub const END_MARKER: &str = "-----END CERTIFICATE-----";

/// Decode one PEM certificate block to DER.
///
/// Everything outside the BEGIN/END markers (annotation comments, blank
/// lines) is ignored. Exactly one certificate must be present.
///
/// # Errors
///
/// Returns `AnchorError::MalformedInput` if a marker is missing, more than
/// one certificate is framed, or the body is not valid base64.
pub fn decode_pem_block(text: &str) -> Result<Vec<u8>> {
    let start = text
        .find(BEGIN_MARKER)
        .ok_or_else(|| AnchorError::malformed("missing BEGIN CERTIFICATE marker"))?;
    let end = text[start..]
        .find(END_MARKER)
        .map(|offset| start + offset + END_MARKER.len())
        .ok_or_else(|| AnchorError::malformed("missing END CERTIFICATE marker"))?;

    if text[end..].contains(BEGIN_MARKER) {
        return Err(AnchorError::malformed(
            "more than one certificate in a single block",
        ));
    }

    let block = pem::parse(&text[start..end])
        .map_err(|e| AnchorError::malformed(format!("invalid PEM body: {e}")))?;
    if block.contents().is_empty() {
        return Err(AnchorError::malformed("empty certificate body"));
    }

    Ok(block.into_contents())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armor(body: &str) -> String {
        format!("{BEGIN_MARKER}\n{body}\n{END_MARKER}\n")
    }

    #[test]
    fn decodes_body_and_ignores_surroundings() {
        let text = format!(
            "# Label: \"Test\"\n# SHA256 Fingerprint: 00\n{}trailing words\n",
            armor("aGVsbG8gd29ybGQ=")
        );
        assert_eq!(decode_pem_block(&text).unwrap(), b"hello world");
    }

    #[test]
    fn accepts_wrapped_lines() {
        let text = armor("aGVsbG8g\nd29ybGQ=");
        assert_eq!(decode_pem_block(&text).unwrap(), b"hello world");
    }

    #[test]
    fn missing_markers_are_malformed() {
        let no_begin = format!("aGVsbG8=\n{END_MARKER}\n");
        let no_end = format!("{BEGIN_MARKER}\naGVsbG8=\n");
        for text in [no_begin.as_str(), no_end.as_str(), ""] {
            assert!(matches!(
                decode_pem_block(text),
                Err(AnchorError::MalformedInput { .. })
            ));
        }
    }

    #[test]
    fn end_before_begin_is_malformed() {
        let text = format!("{END_MARKER}\n{BEGIN_MARKER}\naGVsbG8=\n");
        assert!(matches!(
            decode_pem_block(&text),
            Err(AnchorError::MalformedInput { .. })
        ));
    }

    #[test]
    fn invalid_base64_is_malformed() {
        let err = decode_pem_block(&armor("!!!not*base64!!!")).unwrap_err();
        assert!(matches!(err, AnchorError::MalformedInput { .. }));
    }

    #[test]
    fn two_certificates_are_rejected() {
        let text = format!("{}{}", armor("aGVsbG8="), armor("d29ybGQ="));
        assert!(matches!(
            decode_pem_block(&text),
            Err(AnchorError::MalformedInput { .. })
        ));
    }

    #[test]
    fn empty_body_is_rejected() {
        assert!(decode_pem_block(&armor("")).is_err());
    }
}
