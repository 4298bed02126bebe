//! Spreadsheet-like sources (XLSX, XLS, CSV) loaded into [`Grid`]s.

use crate::encoding::decode_text;
use crate::error::{ConversionError, Result};
use crate::grid::{Cell, Grid};
use calamine::{open_workbook_auto, Data, Reader};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Tabular source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpreadsheetKind {
    Xlsx,
    Xls,
    Csv,
}

impl SpreadsheetKind {
    /// Classify a path by its lowercased extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            "csv" => Ok(Self::Csv),
            _ => Err(ConversionError::UnsupportedFormat { extension }),
        }
    }
}

/// A named worksheet.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub grid: Grid,
}

/// Every worksheet of one source file, in workbook order.
#[derive(Debug, Clone)]
pub struct Workbook {
    pub kind: SpreadsheetKind,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// The sheet the orientation optimizer measures.
    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }
}

/// Load a spreadsheet-like file.
pub fn load_workbook(path: &Path) -> Result<Workbook> {
    let kind = SpreadsheetKind::from_path(path)?;
    if !path.exists() {
        return Err(ConversionError::InputNotFound(path.to_path_buf()));
    }

    let sheets = match kind {
        SpreadsheetKind::Xlsx | SpreadsheetKind::Xls => load_excel_sheets(path)?,
        SpreadsheetKind::Csv => vec![load_csv_sheet(path)?],
    };

    debug!("Loaded {} sheet(s) from {:?}", sheets.len(), path);
    Ok(Workbook { kind, sheets })
}

fn load_excel_sheets(path: &Path) -> Result<Vec<Sheet>> {
    let mut workbook = open_workbook_auto(path)?;
    let mut sheets = Vec::new();

    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        // Ranges start at the first used cell; shift back so the grid is anchored at A1.
        let (row0, col0) = range.start().unwrap_or((0, 0));
        let grid = Grid::from_positioned(range.cells().map(|(r, c, data)| {
            (row0 as usize + r, col0 as usize + c, cell_from_data(data))
        }));
        sheets.push(Sheet { name, grid });
    }

    Ok(sheets)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) if dt.is_datetime() => match dt.as_datetime() {
            Some(datetime) => Cell::Text(datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::Text(dt.to_string()),
        },
        Data::DateTimeIso(s) => Cell::Text(s.replace('T', " ")),
        other => Cell::Text(other.to_string()),
    }
}

fn load_csv_sheet(path: &Path) -> Result<Sheet> {
    let bytes = std::fs::read(path)?;
    let text = decode_text(&bytes);
    let grid = parse_csv(&text)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("csv")
        .to_string();
    Ok(Sheet { name, grid })
}

/// Parse CSV text. Every record is a row, including the first.
pub fn parse_csv(text: &str) -> Result<Grid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(Grid::new(rows))
}
