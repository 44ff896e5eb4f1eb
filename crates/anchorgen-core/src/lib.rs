//! Core types for the trust anchor table builder.
//!
//! This crate provides the foundational types shared by the pipeline:
//!
//! - **Types**: [`CertificateRecord`] (one decoded input certificate),
//!   [`OverrideEntry`] (a curated name-constraints replacement),
//!   [`TrustAnchor`] and [`AnchorTable`] (the emitted output)
//! - **Errors**: the fatal error taxonomy in [`AnchorError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use anchorgen_core::{AnchorTable, Result};
//!
//! fn summarize(table: &AnchorTable) -> Result<()> {
//!     for anchor in table {
//!         println!("{} constrained={}", anchor.fingerprint, anchor.name_constraints.is_some());
//!     }
//!     Ok(())
//! }
//! ```

mod error;
pub mod types;

pub use error::{AnchorError, Result};
pub use types::*;
