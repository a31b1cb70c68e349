use thiserror::Error;

/// Errors raised while opening, parsing or writing a document package.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Not a readable document package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed XML in document part: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Document package is missing required part '{0}'")]
    MissingPart(String),

    #[error("Invalid document package: {0}")]
    InvalidPackage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
