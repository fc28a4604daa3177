//! Error types for the paperlode library.

use std::io;
use thiserror::Error;

/// Result type alias for paperlode operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while turning a PDF into structured content.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// The remote parsing service rejected or failed the upload.
    #[error("Remote upload failed: {0}")]
    RemoteUpload(String),

    /// The remote parsing job reached a failed terminal status.
    #[error("Remote parsing job failed: {0}")]
    RemoteJobFailed(String),

    /// The remote parsing job did not finish within the poll budget.
    #[error("Remote parsing job timed out after {0} seconds")]
    RemotePollTimeout(u64),

    /// Error retrieving or decoding the remote parsing result.
    #[error("Remote result error: {0}")]
    RemoteResult(String),

    /// A section move would make a node its own ancestor.
    #[error("Section move rejected: cycle through {0:?}")]
    CycleDetected(String),

    /// The referenced section does not exist in the forest.
    #[error("Section not found: {0:?}")]
    SectionNotFound(String),

    /// All strategies in a parse chain failed.
    #[error("All parse strategies failed; last error: {0}")]
    AllStrategiesFailed(Box<Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the caller should try the next strategy in a fallback chain.
    ///
    /// Remote failures are recoverable by falling back; corrupted input and
    /// I/O errors generally are too, since the raw-byte extractor accepts
    /// anything. Only cycle/section errors from tree operations are terminal.
    pub fn is_fallback_eligible(&self) -> bool {
        !matches!(self, Error::CycleDetected(_) | Error::SectionNotFound(_))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::RemotePollTimeout(60);
        assert_eq!(
            err.to_string(),
            "Remote parsing job timed out after 60 seconds"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_fallback_eligibility() {
        assert!(Error::RemotePollTimeout(60).is_fallback_eligible());
        assert!(Error::PdfParse("bad xref".into()).is_fallback_eligible());
        assert!(!Error::CycleDetected("Methods".into()).is_fallback_eligible());
    }
}
