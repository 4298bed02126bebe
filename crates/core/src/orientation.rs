//! Printed page-count estimation and portrait/landscape selection.

use crate::config::PageCapacity;
use crate::error::{ConversionError, Result};
use crate::tabular::{load_workbook, SpreadsheetKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use umya_spreadsheet::structs::OrientationValues;

/// Page layout orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Canvas size for this orientation, given the portrait `(width, height)`.
    pub fn canvas_size(self, portrait_width: u32, portrait_height: u32) -> (u32, u32) {
        match self {
            Orientation::Portrait => (portrait_width, portrait_height),
            Orientation::Landscape => (portrait_height, portrait_width),
        }
    }
}

impl PageCapacity {
    /// `(rows_per_page, cols_per_page)` for an orientation.
    pub fn per_page(&self, orientation: Orientation) -> (usize, usize) {
        match orientation {
            Orientation::Portrait => (self.portrait_rows, self.portrait_cols),
            Orientation::Landscape => (self.landscape_rows, self.landscape_cols),
        }
    }
}

/// Estimate how many printed pages `rows` x `cols` cells span.
///
/// Each axis is charged `count / per_page + 1` pages, so an exact multiple of
/// the page capacity still costs one extra page.
pub fn estimate_pages(
    rows: usize,
    cols: usize,
    orientation: Orientation,
    capacity: &PageCapacity,
) -> usize {
    let (rows_per_page, cols_per_page) = capacity.per_page(orientation);
    let row_pages = rows / rows_per_page + 1;
    let col_pages = cols / cols_per_page + 1;
    row_pages * col_pages
}

/// Landscape only when it is strictly cheaper; ties stay portrait.
pub fn choose_orientation(rows: usize, cols: usize, capacity: &PageCapacity) -> Orientation {
    let portrait = estimate_pages(rows, cols, Orientation::Portrait, capacity);
    let landscape = estimate_pages(rows, cols, Orientation::Landscape, capacity);
    debug!(
        "{}x{} cells: {} portrait page(s), {} landscape page(s)",
        rows, cols, portrait, landscape
    );
    if landscape < portrait {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    }
}

/// Pick the orientation that prints the first sheet of `path` on fewer pages.
///
/// With `persist` set, XLSX inputs get the result written into the first
/// worksheet's page setup and are saved in place.
pub fn optimal_orientation(
    path: &Path,
    capacity: &PageCapacity,
    persist: bool,
) -> Result<Orientation> {
    let workbook = load_workbook(path)?;
    let (rows, cols) = workbook
        .first_sheet()
        .map(|sheet| sheet.grid.extent(workbook.kind))
        .unwrap_or((0, 0));

    let orientation = choose_orientation(rows, cols, capacity);

    if persist && workbook.kind == SpreadsheetKind::Xlsx {
        persist_xlsx_orientation(path, orientation)?;
        info!("Saved {:?} page setup into {:?}", orientation, path);
    }

    Ok(orientation)
}

fn persist_xlsx_orientation(path: &Path, orientation: Orientation) -> Result<()> {
    let mut book = umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|e| ConversionError::SpreadsheetError(format!("Failed to read XLSX: {}", e)))?;

    let value = match orientation {
        Orientation::Portrait => OrientationValues::Portrait,
        Orientation::Landscape => OrientationValues::Landscape,
    };
    let sheet = book.get_sheet_mut(&0).ok_or_else(|| {
        ConversionError::SpreadsheetError("Workbook has no worksheets".to_string())
    })?;
    sheet.get_page_setup_mut().set_orientation(value);

    umya_spreadsheet::writer::xlsx::write(&book, path)
        .map_err(|e| ConversionError::SpreadsheetError(format!("Failed to write XLSX: {}", e)))
}
