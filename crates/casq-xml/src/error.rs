//! XML parsing errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("document contains non-UTF-8 data: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("document has no root element")]
    NoRoot,

    #[error("unexpected closing tag </{0}>")]
    UnexpectedClose(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type XmlResult<T> = std::result::Result<T, XmlError>;
