//! Conversion pipeline and validator client behind the `casq` binary.

pub mod commands;
pub mod validate;

pub use commands::{convert, ConvertOptions};
