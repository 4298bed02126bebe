//! # tifferator-core
//!
//! Batch conversion of mixed document folders into multi-frame TIFF files.
//!
//! Every file in an input directory is routed by its suffix to a converter:
//!
//! - **PDF** pages are rasterized with pdfium
//! - **Images** (png, jpg, jpeg, bmp, gif) become a single frame
//! - **DOCX** paragraphs are drawn one per page
//! - **Spreadsheets** (xlsx, xls, csv) are laid out as text grids. XLSX pages
//!   take whichever orientation needs fewer pages; XLS and CSV print landscape
//! - **Email** (eml, msg) bodies are drawn on one page
//!
//! Each converted document becomes `<output_dir>/<stem>.tiff`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tifferator_core::{BatchDriver, CancellationToken, ConverterConfig};
//! use std::path::Path;
//!
//! fn main() -> tifferator_core::Result<()> {
//!     let mut driver = BatchDriver::new(ConverterConfig::new(200))?;
//!     let token = CancellationToken::new();
//!
//!     let report = driver.run(
//!         Path::new("./inbox"),
//!         Path::new("./tiffs"),
//!         &token,
//!         |progress| println!("{}", progress.message()),
//!     )?;
//!
//!     println!("{} TIFF files written", report.outputs().count());
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod cancel;
pub mod canvas;
pub mod config;
pub mod converter;
pub mod dispatch;
pub mod docx;
pub mod email;
pub mod encoding;
pub mod error;
pub mod grid;
pub mod orientation;
pub mod paginator;
pub mod pdf_renderer;
pub mod tabular;
pub mod tiff_writer;

// Re-export main types for convenience
pub use batch::BatchDriver;
pub use cancel::CancellationToken;
pub use config::{
    BatchProgress, BatchReport, ConverterConfig, FailedFile, FileResult, FileStatus,
    LayoutConfig, PageCapacity, RenderConfig, RunOutcome, TiffCompression,
};
pub use converter::Converter;
pub use dispatch::DocumentKind;
pub use error::{ConversionError, Result};
pub use orientation::Orientation;
pub use pdf_renderer::PdfRenderer;

/// File suffixes the batch driver converts. Anything else is skipped.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "pdf", "png", "jpg", "jpeg", "bmp", "gif", "docx", "xlsx", "xls", "csv", "msg", "eml",
];

/// Check whether a file name would be picked up by a converter.
pub fn is_supported_file(name: &str) -> bool {
    DocumentKind::from_file_name(name).is_some()
}

/// Initialize the library's logging.
/// Call this once at application startup if you want to see logs.
///
/// `RUST_LOG` wins when set; otherwise this crate logs at `info`.
pub fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tifferator_core=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
