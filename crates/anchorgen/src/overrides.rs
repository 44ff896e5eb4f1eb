//! Curated name-constraint overrides.
//!
//! Some CAs are trusted only for a national namespace even though their
//! certificates carry no (or weaker) name constraints. The entries below
//! follow Mozilla's NSS policy in `lib/certdb/genname.c`, so that the table
//! restricts these anchors the same way the Mozilla root program does.
//!
//! Keys are compared as exact bytes against a certificate's subject `Name`
//! value. Nothing here parses or normalizes distinguished names.

use anchorgen_core::OverrideEntry;
use tracing::debug;

const NSS_GENNAME: &str = "https://hg.mozilla.org/projects/nss/file/tip/lib/certdb/genname.c";

/// Subject of IGC/A, the root of the Agence Nationale de la Securite des
/// Systemes d'Information (ANSSI).
pub const ANSSI_SUBJECT_DN: &[u8] = b"\
    \x31\x0B\x30\x09\x06\x03\x55\x04\x06\x13\x02FR\
    \x31\x0F\x30\x0D\x06\x03\x55\x04\x08\x13\x06France\
    \x31\x0E\x30\x0C\x06\x03\x55\x04\x07\x13\x05Paris\
    \x31\x10\x30\x0E\x06\x03\x55\x04\x0A\x13\x07PM/SGDN\
    \x31\x0E\x30\x0C\x06\x03\x55\x04\x0B\x13\x05DCSSI\
    \x31\x0E\x30\x0C\x06\x03\x55\x04\x03\x13\x05IGC/A\
    \x31\x23\x30\x21\x06\x09\x2A\x86\x48\x86\xF7\x0D\x01\x09\x01\
    \x16\x14igca@sgdn.pm.gouv.fr";

/// French government and overseas territory TLDs.
pub const ANSSI_NAME_CONSTRAINTS: &[u8] = b"\
    \x30\x5D\xA0\x5B\
    \x30\x05\x82\x03.fr\
    \x30\x05\x82\x03.gp\
    \x30\x05\x82\x03.gf\
    \x30\x05\x82\x03.mq\
    \x30\x05\x82\x03.re\
    \x30\x05\x82\x03.yt\
    \x30\x05\x82\x03.pm\
    \x30\x05\x82\x03.bl\
    \x30\x05\x82\x03.mf\
    \x30\x05\x82\x03.wf\
    \x30\x05\x82\x03.pf\
    \x30\x05\x82\x03.nc\
    \x30\x05\x82\x03.tf";

/// Subject of TUBITAK Kamu SM SSL Kok Sertifikasi - Surum 1.
pub const TUBITAK1_SUBJECT_DN: &[u8] = b"\
    \x31\x0b\x30\x09\x06\x03\x55\x04\x06\x13\x02TR\
    \x31\x18\x30\x16\x06\x03\x55\x04\x07\x13\x0fGebze - Kocaeli\
    \x31\x42\x30\x40\x06\x03\x55\x04\x0a\x13\x39Turkiye Bilimsel ve Teknolojik Arastirma Kurumu - TUBITAK\
    \x31\x2d\x30\x2b\x06\x03\x55\x04\x0b\x13\x24Kamu Sertifikasyon Merkezi - Kamu SM\
    \x31\x36\x30\x34\x06\x03\x55\x04\x03\x13\x2dTUBITAK Kamu SM SSL Kok Sertifikasi - Surum 1";

/// Turkish public-sector second-level domains.
pub const TUBITAK1_NAME_CONSTRAINTS: &[u8] = b"\
    \x30\x65\xa0\x63\
    \x30\x09\x82\x07.gov.tr\
    \x30\x09\x82\x07.k12.tr\
    \x30\x09\x82\x07.pol.tr\
    \x30\x09\x82\x07.mil.tr\
    \x30\x09\x82\x07.tsk.tr\
    \x30\x09\x82\x07.kep.tr\
    \x30\x09\x82\x07.bel.tr\
    \x30\x09\x82\x07.edu.tr\
    \x30\x09\x82\x07.org.tr";

/// Overrides applied by default.
pub const BUILTIN_OVERRIDES: &[OverrideEntry<'static>] = &[
    OverrideEntry {
        name: "ANSSI IGC/A",
        subject_dn: ANSSI_SUBJECT_DN,
        name_constraints: ANSSI_NAME_CONSTRAINTS,
        source: NSS_GENNAME,
    },
    OverrideEntry {
        name: "TUBITAK Kamu SM SSL Kok Sertifikasi - Surum 1",
        subject_dn: TUBITAK1_SUBJECT_DN,
        name_constraints: TUBITAK1_NAME_CONSTRAINTS,
        source: NSS_GENNAME,
    },
];

/// Read-only map from subject bytes to imposed name constraints.
///
/// Small enough that a linear scan beats anything cleverer. Keys must be
/// unique; [`OverrideTable::new`] does not check.
#[derive(Debug, Clone, Copy)]
pub struct OverrideTable<'a> {
    entries: &'a [OverrideEntry<'a>],
}

impl<'a> OverrideTable<'a> {
    #[must_use]
    pub const fn new(entries: &'a [OverrideEntry<'a>]) -> Self {
        Self { entries }
    }

    /// An empty table: no certificate is overridden.
    #[must_use]
    pub const fn empty() -> Self {
        Self { entries: &[] }
    }

    /// Entry whose key equals `subject_dn` exactly.
    #[must_use]
    pub fn find(&self, subject_dn: &[u8]) -> Option<&'a OverrideEntry<'a>> {
        self.entries.iter().find(|e| e.subject_dn == subject_dn)
    }

    /// Name constraints imposed on `subject_dn`, if any.
    #[must_use]
    pub fn lookup(&self, subject_dn: &[u8]) -> Option<&'a [u8]> {
        let entry = self.find(subject_dn)?;
        debug!(ca = entry.name, source = entry.source, "name constraints override matched");
        Some(entry.name_constraints)
    }

    #[must_use]
    pub const fn entries(&self) -> &'a [OverrideEntry<'a>] {
        self.entries
    }
}

impl OverrideTable<'static> {
    /// The built-in ANSSI and TUBITAK overrides.
    #[must_use]
    pub const fn builtin() -> Self {
        Self::new(BUILTIN_OVERRIDES)
    }
}

impl Default for OverrideTable<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Look up `subject_dn` in the built-in overrides.
#[must_use]
pub fn lookup(subject_dn: &[u8]) -> Option<&'static [u8]> {
    OverrideTable::builtin().lookup(subject_dn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use x509_parser::der_parser::asn1_rs::FromDer;
    use x509_parser::extensions::NameConstraints;
    use x509_parser::x509::X509Name;

    #[test]
    fn builtin_keys_are_unique() {
        let entries = OverrideTable::builtin().entries();
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                assert_ne!(a.subject_dn, b.subject_dn, "{} and {}", a.name, b.name);
            }
        }
    }

    #[test]
    fn builtin_values_are_permitted_dns_subtrees() {
        let counts = [13, 9];
        for (entry, count) in OverrideTable::builtin().entries().iter().zip(counts) {
            let (rest, nc) = NameConstraints::from_der(entry.name_constraints).unwrap();
            assert!(rest.is_empty(), "{}", entry.name);
            assert_eq!(nc.permitted_subtrees.map(|p| p.len()), Some(count), "{}", entry.name);
            assert!(nc.excluded_subtrees.is_none(), "{}", entry.name);
        }
    }

    #[test]
    fn builtin_keys_are_name_values() {
        for entry in OverrideTable::builtin().entries() {
            // keys omit the outer SEQUENCE header of the Name
            let name = yasna::construct_der(|w| {
                w.write_sequence(|w| w.next().write_der(entry.subject_dn));
            });
            let (rest, name) = X509Name::from_der(&name).unwrap();
            assert!(rest.is_empty(), "{}", entry.name);
            assert!(name.iter_common_name().next().is_some(), "{}", entry.name);
        }
    }

    #[test]
    fn lookup_matches_exact_subject() {
        assert_eq!(lookup(ANSSI_SUBJECT_DN), Some(ANSSI_NAME_CONSTRAINTS));
        assert_eq!(lookup(TUBITAK1_SUBJECT_DN), Some(TUBITAK1_NAME_CONSTRAINTS));
    }

    #[test]
    fn lookup_misses_near_matches() {
        assert_eq!(lookup(b""), None);
        assert_eq!(lookup(&ANSSI_SUBJECT_DN[..ANSSI_SUBJECT_DN.len() - 1]), None);

        let mut upper = ANSSI_SUBJECT_DN.to_vec();
        let last = upper.len() - 1;
        upper[last] = b'R';
        assert_eq!(lookup(&upper), None);
    }

    #[test]
    fn custom_and_empty_tables() {
        let custom = [OverrideEntry {
            name: "test",
            subject_dn: b"\x31\x00",
            name_constraints: b"\x30\x00",
            source: "unit test",
        }];
        let table = OverrideTable::new(&custom);
        assert_eq!(table.lookup(b"\x31\x00"), Some(&b"\x30\x00"[..]));
        assert_eq!(table.lookup(ANSSI_SUBJECT_DN), None);
        assert!(OverrideTable::empty().lookup(ANSSI_SUBJECT_DN).is_none());
    }
}
