//! In-memory table of cell values.

use crate::tabular::SpreadsheetKind;
use std::fmt;

/// One cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

/// Smallest rectangle containing every non-empty cell. 0-based, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

/// A rectangular table anchored at the sheet origin (A1).
///
/// Rows may be ragged; missing trailing cells are treated as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    bounds: Option<Bounds>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        let bounds = populated_bounds(&rows);
        Self { rows, bounds }
    }

    /// Build a grid from cells positioned at absolute `(row, col)` coordinates.
    pub fn from_positioned<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize, Cell)>,
    {
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for (row, col, cell) in cells {
            if rows.len() <= row {
                rows.resize_with(row + 1, Vec::new);
            }
            let cells = &mut rows[row];
            if cells.len() <= col {
                cells.resize_with(col + 1, Cell::default);
            }
            cells[col] = cell;
        }
        Self::new(rows)
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn is_blank(&self) -> bool {
        self.bounds.is_none()
    }

    /// Row and column extent charged by the page-count estimator.
    ///
    /// XLSX sheets are measured from A1 to the bottom-right populated cell when
    /// anything is populated; XLS and CSV use the raw sheet dimensions.
    pub fn extent(&self, kind: SpreadsheetKind) -> (usize, usize) {
        match (kind, self.bounds) {
            (SpreadsheetKind::Xlsx, Some(b)) => (b.max_row + 1, b.max_col + 1),
            _ => (self.row_count(), self.col_count()),
        }
    }
}

fn populated_bounds(rows: &[Vec<Cell>]) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            bounds = Some(match bounds {
                None => Bounds {
                    min_row: r,
                    max_row: r,
                    min_col: c,
                    max_col: c,
                },
                Some(b) => Bounds {
                    min_row: b.min_row.min(r),
                    max_row: b.max_row.max(r),
                    min_col: b.min_col.min(c),
                    max_col: b.max_col.max(c),
                },
            });
        }
    }
    bounds
}
