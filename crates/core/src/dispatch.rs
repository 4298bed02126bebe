//! Suffix-based routing of input files to converters.

use crate::email::EmailKind;
use crate::tabular::SpreadsheetKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Raster image suffixes, matched case-insensitively.
pub const IMAGE_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".bmp", ".gif"];

/// What kind of document a file is, judged by its name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    RasterImage,
    WordDoc,
    Spreadsheet(SpreadsheetKind),
    Email(EmailKind),
}

impl DocumentKind {
    /// Route a file name through the suffix table.
    ///
    /// `.pdf`, `.docx`, `.msg` and `.eml` match case-sensitively; image and
    /// spreadsheet suffixes match in any case. `None` means the file is skipped.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();

        if name.ends_with(".pdf") {
            Some(Self::Pdf)
        } else if IMAGE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
            Some(Self::RasterImage)
        } else if name.ends_with(".docx") {
            Some(Self::WordDoc)
        } else if lower.ends_with(".xlsx") {
            Some(Self::Spreadsheet(SpreadsheetKind::Xlsx))
        } else if lower.ends_with(".xls") {
            Some(Self::Spreadsheet(SpreadsheetKind::Xls))
        } else if lower.ends_with(".csv") {
            Some(Self::Spreadsheet(SpreadsheetKind::Csv))
        } else if name.ends_with(".msg") {
            Some(Self::Email(EmailKind::Msg))
        } else if name.ends_with(".eml") {
            Some(Self::Email(EmailKind::Eml))
        } else {
            None
        }
    }

    /// Route a path by its final component.
    ///
    /// Names that are not valid UTF-8 are matched on their lossy form, so the
    /// suffix still decides.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?;
        Self::from_file_name(&name.to_string_lossy())
    }
}

/// `output_dir/<input file stem>.tiff`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "output".into());
    name.push(".tiff");
    output_dir.join(name)
}
