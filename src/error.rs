//! Error types for noteport library.

use std::io;
use thiserror::Error;

use crate::export::ExportFormat;

/// Result type alias for noteport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while exporting documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when writing an exported artifact.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document JSON could not be read.
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested export format is not one of the supported formats.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// An encoder failed to produce its payload.
    #[error("Failed to export {format}: {source}")]
    ExportFailed {
        /// Format that was being produced
        format: ExportFormat,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Error writing the PDF object graph.
    #[error("PDF generation error: {0}")]
    Pdf(String),

    /// Error building the DOCX package.
    #[error("DOCX packaging error: {0}")]
    Package(String),

    /// Error writing CSV records.
    #[error("CSV error: {0}")]
    Csv(String),

    /// The print engine is unavailable or rejected the job.
    #[error("Print engine error: {0}")]
    Engine(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an encoder failure with the format that produced it.
    pub fn export_failed(format: ExportFormat, source: Error) -> Self {
        Error::ExportFailed {
            format,
            source: Box::new(source),
        }
    }

    /// Check if this error is an unsupported format request.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Error::UnsupportedFormat(_))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Pdf(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Package(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err.to_string())
    }
}
