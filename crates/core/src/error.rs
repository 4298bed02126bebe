//! Error types for tiff-erator conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the tiff-erator library.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Input file not found.
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Unsupported file format.
    #[error("Unsupported file type: .{extension}. Supported spreadsheets: .xlsx, .xls, .csv")]
    UnsupportedFormat { extension: String },

    /// Generic I/O failure while reading an input or writing an output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Pdfium library error.
    #[error("Pdfium error: {0}")]
    PdfiumError(String),

    /// PDF rendering failed.
    #[error("PDF rendering failed: {0}")]
    PdfRenderError(String),

    /// DOCX parsing failed.
    #[error("DOCX parsing failed: {0}")]
    DocxError(String),

    /// XLSX/XLS reading or writing failed.
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),

    /// CSV parsing failed.
    #[error("CSV parsing failed: {0}")]
    CsvError(String),

    /// EML/MSG parsing failed.
    #[error("Email parsing failed: {0}")]
    EmailError(String),

    /// Raster image decoding failed.
    #[error("Image error: {0}")]
    ImageError(String),

    /// TIFF encoding failed.
    #[error("TIFF encoding failed: {0}")]
    TiffEncodingError(String),

    /// Output directory creation or output write failed.
    #[error("Failed to write output '{path}': {message}")]
    OutputDirError { path: PathBuf, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The cancellation token fired while a document was being paginated.
    #[error("Conversion cancelled")]
    Cancelled,
}

/// Result type alias for convenience.
pub type Result<T> = std::result::Result<T, ConversionError>;

impl From<image::ImageError> for ConversionError {
    fn from(err: image::ImageError) -> Self {
        ConversionError::ImageError(err.to_string())
    }
}

impl From<tiff::TiffError> for ConversionError {
    fn from(err: tiff::TiffError) -> Self {
        ConversionError::TiffEncodingError(err.to_string())
    }
}

impl From<csv::Error> for ConversionError {
    fn from(err: csv::Error) -> Self {
        ConversionError::CsvError(err.to_string())
    }
}

impl From<calamine::Error> for ConversionError {
    fn from(err: calamine::Error) -> Self {
        ConversionError::SpreadsheetError(err.to_string())
    }
}

impl ConversionError {
    /// Whether this error came from the cancellation token rather than a real failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ConversionError::Cancelled)
    }
}
