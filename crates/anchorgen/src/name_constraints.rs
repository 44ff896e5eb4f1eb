//! Building NameConstraints extensions from lists of DNS suffixes.
//!
//! CCADB publishes "Mozilla Applied Constraints" as a list of permitted DNS
//! subtrees such as `*.gov.tr`. This turns such a list into the DER the
//! override table stores:
//!
//! ```text
//! NameConstraints ::= SEQUENCE {
//!     permittedSubtrees [0] GeneralSubtrees OPTIONAL, ... }
//! GeneralSubtree  ::= SEQUENCE { base GeneralName, ... }
//! GeneralName     ::= CHOICE { ..., dNSName [2] IA5String, ... }
//! ```

use anchorgen_core::{AnchorError, Result};
use yasna::Tag;

/// `dNSName` alternative of `GeneralName`.
const DNS_NAME: u64 = 2;

/// `permittedSubtrees` field of `NameConstraints`.
const PERMITTED_SUBTREES: u64 = 0;

/// Encode a NameConstraints value permitting only the given DNS subtrees.
///
/// A leading `*` is dropped, so `*.gov.tr` and `.gov.tr` encode the same.
/// Subtrees keep their input order.
///
/// # Errors
///
/// Returns `AnchorError::Encoding` if the list is empty or a suffix is
/// empty or not ASCII (dNSName is an IA5String).
pub fn permitted_dns_subtrees(suffixes: &[&str]) -> Result<Vec<u8>> {
    if suffixes.is_empty() {
        return Err(AnchorError::Encoding(
            "at least one permitted subtree is required".into(),
        ));
    }

    let names = suffixes
        .iter()
        .map(|suffix| {
            let name = suffix.trim_start_matches('*');
            if name.is_empty() {
                return Err(AnchorError::Encoding(format!(
                    "permitted subtree {suffix:?} is empty"
                )));
            }
            if !name.is_ascii() {
                return Err(AnchorError::Encoding(format!(
                    "permitted subtree {suffix:?} is not an IA5String"
                )));
            }
            Ok(name)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(yasna::construct_der(|w| {
        w.write_sequence(|w| {
            w.next()
                .write_tagged_implicit(Tag::context(PERMITTED_SUBTREES), |w| {
                    w.write_sequence(|w| {
                        for name in &names {
                            w.next().write_sequence(|w| {
                                w.next()
                                    .write_tagged_implicit(Tag::context(DNS_NAME), |w| {
                                        w.write_ia5_string(name);
                                    });
                            });
                        }
                    });
                });
        });
    }))
}
