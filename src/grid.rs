//! Raw cell grids as supplied by a spreadsheet engine.

use chrono::NaiveDateTime;
use std::fmt;

/// A source cell tagged with its native kind.
///
/// Only `Empty`, `Number`, `DateTime` and `Text` carry meaning for the
/// converter; the remaining kinds exist because engines produce them.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawCell {
    #[default]
    Empty,
    /// Spreadsheets present every number (integers, currency, percent) as a float
    Number(f64),
    DateTime(NaiveDateTime),
    Text(String),
    Boolean(bool),
    Duration(String),
    Error(String),
}

impl RawCell {
    pub fn kind_name(&self) -> &'static str {
        match self {
            RawCell::Empty => "empty",
            RawCell::Number(_) => "number",
            RawCell::DateTime(_) => "datetime",
            RawCell::Text(_) => "text",
            RawCell::Boolean(_) => "boolean",
            RawCell::Duration(_) => "duration",
            RawCell::Error(_) => "error",
        }
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        RawCell::Text(s.to_string())
    }
}

impl From<String> for RawCell {
    fn from(s: String) -> Self {
        RawCell::Text(s)
    }
}

impl From<f64> for RawCell {
    fn from(n: f64) -> Self {
        RawCell::Number(n)
    }
}

impl From<NaiveDateTime> for RawCell {
    fn from(dt: NaiveDateTime) -> Self {
        RawCell::DateTime(dt)
    }
}

/// Dense rectangle of raw cells (a sheet's used range), 1-indexed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<RawCell>,
}

static EMPTY: RawCell = RawCell::Empty;

impl Grid {
    /// Build from row-major rows; short rows are padded with `Empty`.
    pub fn from_rows(rows: Vec<Vec<RawCell>>) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut cells = Vec::with_capacity(height * width);
        for mut row in rows {
            row.resize(width, RawCell::Empty);
            cells.extend(row);
        }
        Self {
            height,
            width,
            cells,
        }
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Cell at 1-indexed `row`, `col`. Outside the grid reads as `Empty`.
    pub fn get(&self, row: usize, col: usize) -> &RawCell {
        if row == 0 || col == 0 || row > self.height || col > self.width {
            return &EMPTY;
        }
        &self.cells[(row - 1) * self.width + (col - 1)]
    }
}

/// 1-indexed cell address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letter(self.col), self.row)
    }
}

/// Inclusive rectangle between two 1-indexed corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub top_left: CellRef,
    pub bottom_right: CellRef,
}

impl CellRange {
    /// Range anchored at A1 covering `rows` x `cols` cells. Both must be non-zero.
    pub fn from_origin(rows: usize, cols: usize) -> Self {
        Self {
            top_left: CellRef::new(1, 1),
            bottom_right: CellRef::new(rows, cols),
        }
    }

    pub fn rows(&self) -> usize {
        self.bottom_right.row + 1 - self.top_left.row
    }

    pub fn cols(&self) -> usize {
        self.bottom_right.col + 1 - self.top_left.col
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.top_left, self.bottom_right)
    }
}

/// Convert 1-indexed column number to Excel letters (1→A, 26→Z, 27→AA)
pub fn column_letter(col: usize) -> String {
    let mut result = String::new();
    let mut num = col;

    while num > 0 {
        let remainder = (num - 1) % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        num = (num - 1) / 26;
    }

    result
}
