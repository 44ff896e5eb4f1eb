//! # anchorgen
//!
//! Builds the trust anchor table a certificate path validator starts from.
//!
//! Input is a bundle of PEM root certificates, each annotated with the
//! SHA-256 of its SubjectPublicKeyInfo. Output is one [`TrustAnchor`] per
//! certificate: subject, SPKI and optional name constraints, ordered by
//! SPKI hash. Name constraints for a few CAs are replaced by a curated
//! override table, matched by exact subject bytes.
//!
//! ## Data Flow
//!
//! ```text
//! bundle text
//!   -> split_bundle() + annotations        (decoder::bundle)
//!   -> decode_pem_block() + extract_fields  (decoder)
//!   -> CertificateRecord per certificate
//!   -> integrity check, CA policy, override lookup, dedup
//!   -> AnchorTable sorted by SPKI hash      (assembler)
//! ```
//!
//! Every failure aborts the whole run; there is no partial table.

pub mod assembler;
pub mod config;
pub mod decoder;
pub mod hash;
pub mod name_constraints;
pub mod overrides;
pub mod table;

pub use anchorgen_core::*;
pub use assembler::Assembler;
pub use config::PipelineConfig;
pub use overrides::{OverrideTable, BUILTIN_OVERRIDES};
pub use table::{spki_value, table_digest, to_json};

/// Build the anchor table for `bundle` with the built-in overrides.
///
/// # Errors
///
/// The first decoding, integrity, duplicate or CA-policy failure.
pub fn build_anchor_table(bundle: &str, config: &PipelineConfig) -> Result<AnchorTable> {
    Assembler::new(config.clone()).assemble(bundle)
}
