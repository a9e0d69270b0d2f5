//! Error types for hwp2docx.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for hwp2docx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that abort a conversion.
///
/// Problems with a single style or run inside an otherwise valid document are
/// not errors; see [`crate::normalizer::ElementSkipped`].
#[derive(Error, Debug)]
pub enum Error {
    /// The input file does not exist or is not a regular file.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// A required external capability (converter engine, reader backend)
    /// cannot be located.
    #[error("Backend unavailable: {0}")]
    UnavailableBackend(String),

    /// The conversion backend ran but did not produce a document.
    #[error("Conversion failed ({backend}): {reason}")]
    ConversionFailed { backend: String, reason: String },

    /// The input is not a readable DOCX package.
    #[error("Invalid DOCX package: {0}")]
    Package(String),

    /// Error occurred while serializing an XML part.
    #[error("XML error: {0}")]
    Xml(String),

    /// Error occurred during file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
