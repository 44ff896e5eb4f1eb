/// A curated replacement for the name constraints of one CA.
///
/// Matched against a certificate by exact equality of `subject_dn` with the
/// certificate's subject bytes; the name is never parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideEntry<'a> {
    /// Human-readable CA name, for logs
    pub name: &'a str,
    /// Subject `Name` value bytes to match
    pub subject_dn: &'a [u8],
    /// NameConstraints DER imposed on the matching anchor
    pub name_constraints: &'a [u8],
    /// Where the policy comes from
    pub source: &'a str,
}
