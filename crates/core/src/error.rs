//! Error types for slide and document text extraction.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during text extraction and packaging.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file format is not supported or could not be detected.
    #[error("Unsupported or unrecognized file format: {0}")]
    UnsupportedFormat(String),

    /// ZIP archive error (PPTX input, DOCX output, exam bundles).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error outside of slide content (relationships, manifest).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// The shape tree of a slide could not be built.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A slide marker emitted by the legacy converter carried no integer.
    #[error("Malformed converter output: {0}")]
    MalformedConverterOutput(String),

    /// The legacy converter could not be launched or exited unsuccessfully.
    #[error("Legacy converter failed ({status}): {stderr}")]
    ConverterFailed {
        /// Exit status as reported by the OS, or the launch error.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// PDF text extraction or rasterisation failed.
    #[error("PDF error: {0}")]
    PdfError(String),

    /// Reading or writing a Word document failed.
    #[error("{0}")]
    DocxError(String),

    /// OCR engine failure.
    #[error("OCR error: {0}")]
    OcrError(String),

    /// Exam package could not be assembled.
    #[error("Package error: {0}")]
    PackageError(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than the host.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedFormat(_)
                | Error::ZipError(_)
                | Error::XmlError(_)
                | Error::MalformedDocument(_)
                | Error::DocxError(_)
                | Error::PackageError(_)
        )
    }
}
