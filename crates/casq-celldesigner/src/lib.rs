//! CellDesigner SBML Level 2 Version 4 reader for CaSQ.

pub mod annotations;
pub mod error;
pub mod reader;

pub use error::{ReadError, ReadResult};
pub use reader::read_celldesigner;
