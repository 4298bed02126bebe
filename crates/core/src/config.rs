//! Configuration and result types for tiff-erator conversion.

use crate::dispatch::DocumentKind;
use crate::error::{ConversionError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// TIFF compression scheme applied to every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TiffCompression {
    /// LZW, the default.
    #[default]
    Lzw,
    /// Deflate (zlib).
    Deflate,
    /// PackBits run-length encoding.
    PackBits,
    /// Uncompressed strips.
    None,
}

/// Configuration for rasterising PDFs and encoding TIFF output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output DPI for PDF pages.
    /// Default: 150.
    pub dpi: u32,

    /// TIFF compression scheme.
    /// Default: LZW.
    pub compression: TiffCompression,

    /// Background color that transparent PDF pixels are flattened onto.
    /// Default: white (255, 255, 255).
    pub background_color: (u8, u8, u8),

    /// Directory containing the pdfium shared library. If None, the current
    /// directory, common system locations and the system loader are tried.
    pub pdfium_library_path: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: 150,
            compression: TiffCompression::Lzw,
            background_color: (255, 255, 255),
            pdfium_library_path: None,
        }
    }
}

impl RenderConfig {
    /// Create a render config with specified DPI.
    pub fn with_dpi(dpi: u32) -> Self {
        Self {
            dpi,
            ..Default::default()
        }
    }

    /// Set the TIFF compression scheme.
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = compression;
        self
    }

    /// Set the pdfium library directory.
    pub fn pdfium_library_path(mut self, path: PathBuf) -> Self {
        self.pdfium_library_path = Some(path);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 || self.dpi > 1200 {
            return Err(ConversionError::InvalidConfig(
                "dpi must be between 1 and 1200".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fixed page geometry and font used for every text-drawn canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Portrait canvas width in pixels (A4 at 300 DPI).
    pub canvas_width: u32,
    /// Portrait canvas height in pixels (A4 at 300 DPI).
    pub canvas_height: u32,
    /// Left edge of the first column and of free text.
    pub origin_x: u32,
    /// Top edge of the first row and of free text.
    pub origin_y: u32,
    /// Horizontal distance between grid columns.
    pub column_pitch: u32,
    /// Vertical distance between grid rows.
    pub row_pitch: u32,
    /// A page is closed once the row cursor reaches `height - bottom_margin`.
    pub bottom_margin: u32,
    /// Truetype font tried first. Falls back to the default sans-serif family.
    pub font_path: Option<PathBuf>,
    /// Font size in pixels.
    pub font_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 2480,
            canvas_height: 3508,
            origin_x: 10,
            origin_y: 10,
            column_pitch: 100,
            row_pitch: 20,
            bottom_margin: 20,
            font_path: Some(PathBuf::from("arial.ttf")),
            font_size: 12.0,
        }
    }
}

impl LayoutConfig {
    /// Set the font file.
    pub fn font_path(mut self, path: PathBuf) -> Self {
        self.font_path = Some(path);
        self
    }

    /// Set the font size.
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConversionError::InvalidConfig(
                "canvas dimensions must be greater than 0".to_string(),
            ));
        }
        if self.column_pitch == 0 || self.row_pitch == 0 {
            return Err(ConversionError::InvalidConfig(
                "column_pitch and row_pitch must be greater than 0".to_string(),
            ));
        }
        if self.origin_y + self.bottom_margin >= self.canvas_height.min(self.canvas_width) {
            return Err(ConversionError::InvalidConfig(
                "origin_y + bottom_margin must fit inside the canvas".to_string(),
            ));
        }
        if !(self.font_size > 0.0) {
            return Err(ConversionError::InvalidConfig(
                "font_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rows and columns that fit on one printed page, per orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageCapacity {
    pub portrait_rows: usize,
    pub portrait_cols: usize,
    pub landscape_rows: usize,
    pub landscape_cols: usize,
}

impl Default for PageCapacity {
    fn default() -> Self {
        Self {
            portrait_rows: 50,
            portrait_cols: 10,
            landscape_rows: 30,
            landscape_cols: 15,
        }
    }
}

impl PageCapacity {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.portrait_rows,
            self.portrait_cols,
            self.landscape_rows,
            self.landscape_cols,
        ];
        if values.contains(&0) {
            return Err(ConversionError::InvalidConfig(
                "page capacity values must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Combined configuration for the converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Render configuration.
    pub render: RenderConfig,

    /// Canvas geometry and font.
    pub layout: LayoutConfig,

    /// Page capacity used by the orientation optimizer.
    pub capacity: PageCapacity,

    /// Write the chosen orientation back into XLSX inputs.
    /// Default: true.
    pub persist_xlsx_orientation: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            layout: LayoutConfig::default(),
            capacity: PageCapacity::default(),
            persist_xlsx_orientation: true,
        }
    }
}

impl ConverterConfig {
    /// Create a new converter config with specified DPI.
    pub fn new(dpi: u32) -> Self {
        Self {
            render: RenderConfig::with_dpi(dpi),
            ..Default::default()
        }
    }

    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        serde_json::from_slice(&data).map_err(|e| {
            ConversionError::InvalidConfig(format!("{}: {}", path.display(), e))
        })
    }

    /// Set the TIFF compression scheme.
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.render.compression = compression;
        self
    }

    /// Enable or disable writing the chosen orientation back into XLSX files.
    pub fn persist_xlsx_orientation(mut self, enabled: bool) -> Self {
        self.persist_xlsx_orientation = enabled;
        self
    }

    /// Validate the entire configuration.
    pub fn validate(&self) -> Result<()> {
        self.render.validate()?;
        self.layout.validate()?;
        self.capacity.validate()?;
        Ok(())
    }
}

/// Status of one directory entry once the driver has moved past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    /// A TIFF was written.
    Converted,
    /// Converted successfully but produced zero pages, so nothing was written.
    NoOutput,
    /// No converter matches the file name.
    Skipped,
    /// Conversion failed; see the batch report.
    Failed,
    /// Cancellation fired while this file was being paginated.
    Cancelled,
}

/// Progress information emitted after each directory entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchProgress {
    /// Number of entries processed so far (1-based index of the last one).
    pub files_done: usize,

    /// Total number of entries in the input directory.
    pub total_files: usize,

    /// Name of the entry just processed.
    pub current_file: String,

    /// What happened to it.
    pub status: FileStatus,
}

impl BatchProgress {
    /// The progress line shown to users.
    pub fn message(&self) -> String {
        format!(
            "Converting {} out of {} files",
            self.files_done, self.total_files
        )
    }
}

/// How a batch run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Every entry was visited.
    Completed,
    /// The cancellation token stopped the run early.
    Stopped,
}

/// Result of a batch conversion run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Number of entries found in the input directory.
    pub total_files: usize,

    /// Number of entries visited before the run ended.
    pub processed: usize,

    /// Files that went through a converter without error.
    pub converted: Vec<FileResult>,

    /// Entries with no matching converter.
    pub skipped: Vec<PathBuf>,

    /// Failed conversions.
    pub failed: Vec<FailedFile>,

    /// How the run ended.
    pub outcome: RunOutcome,

    /// Total processing time.
    pub total_duration: Duration,

    /// Total frames written.
    pub total_pages: usize,
}

impl BatchReport {
    /// Paths of every TIFF written during the run.
    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.converted
            .iter()
            .filter_map(|r| r.output_path.as_deref())
    }
}

/// Result for a single converted file.
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Original input path.
    pub input_path: PathBuf,

    /// Detected kind.
    pub kind: DocumentKind,

    /// Number of frames produced.
    pub page_count: usize,

    /// The TIFF written, if any pages were produced.
    pub output_path: Option<PathBuf>,

    /// Processing time for this file.
    pub duration: Duration,
}

/// Information about a failed conversion.
#[derive(Debug, Clone)]
pub struct FailedFile {
    /// Original input path.
    pub input_path: PathBuf,

    /// Error message.
    pub error: String,
}
