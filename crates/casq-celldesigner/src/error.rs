//! Reader errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("XML error: {0}")]
    Xml(#[from] casq_xml::XmlError),

    #[error("currently limited to SBML Level 2 Version 4")]
    UnsupportedDocument,

    #[error("could not find SBML model element")]
    MissingModel,

    #[error("could not find CellDesigner modelDisplay element")]
    MissingModelDisplay,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ReadResult<T> = std::result::Result<T, ReadError>;
