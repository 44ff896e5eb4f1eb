//! Turning decoded certificates into the final anchor table.
//!
//! The run is all-or-nothing: any failing certificate aborts the batch and
//! no table is produced.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use anchorgen_core::{
    AnchorError, AnchorTable, CertificateId, CertificateRecord, Result, SpkiFingerprint,
    TrustAnchor,
};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::decoder::{decode_entry, parse_entries, BundleEntry};
use crate::hash::spki_fingerprint;
use crate::overrides::OverrideTable;

/// Builds anchor tables from PEM bundles.
#[derive(Debug, Clone)]
pub struct Assembler<'a> {
    overrides: OverrideTable<'a>,
    config: PipelineConfig,
}

impl Assembler<'static> {
    /// Assembler using the built-in overrides.
    #[must_use]
    pub const fn new(config: PipelineConfig) -> Self {
        Self::with_overrides(OverrideTable::builtin(), config)
    }
}

impl<'a> Assembler<'a> {
    #[must_use]
    pub const fn with_overrides(overrides: OverrideTable<'a>, config: PipelineConfig) -> Self {
        Self { overrides, config }
    }

    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Decode every certificate in `bundle` and assemble the table.
    ///
    /// # Errors
    ///
    /// Any decoding, integrity, duplicate or CA-policy failure; see
    /// [`Assembler::assemble_records`].
    pub fn assemble(&self, bundle: &str) -> Result<AnchorTable> {
        self.config.validate()?;
        let entries = parse_entries(bundle, &self.config.fingerprint_annotation)?;
        let records = self.decode_all(&entries)?;
        self.assemble_records(records)
    }

    /// Assemble already decoded certificates.
    ///
    /// Checks run over the whole batch in a fixed order, so the reported
    /// error does not depend on scheduling:
    ///
    /// 1. every declared SPKI hash against the computed one (`Integrity`)
    /// 2. the CA requirement, when enabled (`NotCertificateAuthority`)
    /// 3. uniqueness of SPKI hashes, in bundle order (`DuplicateAnchor`)
    ///
    /// Surviving anchors are ordered by SPKI hash, ascending.
    ///
    /// # Errors
    ///
    /// The first failure in the order above.
    pub fn assemble_records(&self, records: Vec<CertificateRecord>) -> Result<AnchorTable> {
        let fingerprints = records
            .iter()
            .map(verify_integrity)
            .collect::<Result<Vec<_>>>()?;

        if self.config.require_ca {
            if let Some(record) = records.iter().find(|r| !r.is_ca) {
                return Err(AnchorError::NotCertificateAuthority {
                    cert: record.id.to_string(),
                });
            }
        }

        let mut seen: BTreeMap<SpkiFingerprint, CertificateId> = BTreeMap::new();
        let mut anchors = Vec::with_capacity(records.len());
        for (record, fingerprint) in records.into_iter().zip(fingerprints) {
            match seen.entry(fingerprint) {
                Entry::Occupied(previous) => {
                    return Err(AnchorError::DuplicateAnchor {
                        fingerprint: fingerprint.to_hex(),
                        cert: record.id.to_string(),
                        previous: previous.get().to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(record.id.clone());
                }
            }
            anchors.push(self.to_anchor(record, fingerprint));
        }

        let table = AnchorTable::new(anchors);
        info!(
            anchors = table.len(),
            constrained = table.iter().filter(|a| a.name_constraints.is_some()).count(),
            "assembled trust anchor table"
        );
        Ok(table)
    }

    fn to_anchor(&self, record: CertificateRecord, fingerprint: SpkiFingerprint) -> TrustAnchor {
        let name_constraints = match self.overrides.lookup(&record.subject_dn) {
            Some(imposed) => {
                debug!(
                    cert = %record.id,
                    replaced_embedded = record.embedded_name_constraints.is_some(),
                    "imposing name constraints"
                );
                Some(imposed.to_vec())
            }
            None => record.embedded_name_constraints,
        };

        TrustAnchor {
            subject: record.subject_dn,
            spki: record.spki_bytes,
            name_constraints,
            provenance: record.raw_pem,
            fingerprint,
        }
    }

    fn decode_all(&self, entries: &[BundleEntry]) -> Result<Vec<CertificateRecord>> {
        let workers = self.config.worker_count().min(entries.len());
        if !self.config.parallel_decode || workers < 2 {
            return entries.iter().map(decode_entry).collect();
        }

        debug!(workers, certificates = entries.len(), "decoding in parallel");
        let chunk_size = entries.len().div_ceil(workers);
        let decoded: Vec<Vec<Result<CertificateRecord>>> = std::thread::scope(|scope| {
            let handles: Vec<_> = entries
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move || chunk.iter().map(decode_entry).collect::<Vec<_>>()))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        });

        // chunks come back in order, so the first error is the earliest entry
        decoded.into_iter().flatten().collect()
    }
}

impl Default for Assembler<'static> {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

/// Check a record's declared SPKI hash and return the computed one.
fn verify_integrity(record: &CertificateRecord) -> Result<SpkiFingerprint> {
    let computed = spki_fingerprint(&record.spki_bytes);
    if computed == record.declared_spki_hash {
        Ok(computed)
    } else {
        Err(AnchorError::Integrity {
            cert: record.id.to_string(),
            declared: record.declared_spki_hash.to_hex(),
            computed: computed.to_hex(),
        })
    }
}
