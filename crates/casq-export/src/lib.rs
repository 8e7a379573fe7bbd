//! Output writers for CaSQ.
//!
//! This crate contains:
//! - The SBML-qual Level 3 writer with layout and MIRIAM annotations
//! - The CSV variable listing
//! - The BMA JSON export

pub mod bma;
pub mod csv;
pub mod error;
pub mod qual;

pub use bma::write_bma;
pub use csv::write_csv;
pub use error::{ExportError, ExportResult};
pub use qual::{write_qual, QualOptions};
