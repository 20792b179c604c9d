use crate::error::{ConvertError, ConvertResult};
use crate::format::round_half_even_f64;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

//==============================================================================
// Columns and Rows
//==============================================================================

/// Declared kind of a column's values. Cells are always stored as text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Exported with its natural text form
    #[default]
    Text,
    /// Exported with two fraction digits (see `coerce::coerce_decimal_text_for_export`)
    Decimal,
}

/// A named column; its index is its position in the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_text")]
    pub kind: ColumnKind,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Decimal => "decimal",
        }
    }
}

fn is_text(kind: &ColumnKind) -> bool {
    *kind == ColumnKind::Text
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Text,
        }
    }

    pub fn decimal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Decimal,
        }
    }
}

/// One record: cell text positionally aligned with the table's columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

//==============================================================================
// Table
//==============================================================================

/// A named, ordered set of columns and rows, all cells stored as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append a column. Existing rows are padded with an empty cell.
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
        for row in &mut self.rows {
            row.cells.push(String::new());
        }
    }

    /// Append a row; its width must equal the column count.
    pub fn add_row(&mut self, row: Row) -> ConvertResult<()> {
        if row.len() != self.columns.len() {
            return Err(ConvertError::InvalidArgument(format!(
                "Row has {} cells, table '{}' has {} columns",
                row.len(),
                self.name,
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Remove all rows, keeping the columns.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Cell text for `row` / `column`, or an empty string when either is unknown.
    pub fn field(&self, row: usize, column: &str) -> &str {
        self.column_index(column)
            .and_then(|idx| self.rows.get(row).and_then(|r| r.get(idx)))
            .unwrap_or("")
    }

    /// Cell parsed as a number, `0.0` when it is not numeric.
    /// With `places`, the value is rounded half-to-even.
    pub fn number(&self, row: usize, column: &str, places: Option<u32>) -> f64 {
        let value = self.field(row, column).trim().parse::<f64>().unwrap_or(0.0);
        match places {
            Some(places) => round_half_even_f64(value, places),
            None => value,
        }
    }

    /// Validate every row has exactly one cell per column
    pub fn validate_lengths(&self) -> Result<(), String> {
        let width = self.columns.len();
        for (idx, row) in self.rows.iter().enumerate() {
            if row.len() != width {
                return Err(format!(
                    "Table '{}' row {} has {} cells, expected {}",
                    self.name,
                    idx + 1,
                    row.len(),
                    width
                ));
            }
        }
        Ok(())
    }
}

//==============================================================================
// TableSet
//==============================================================================

/// Ordered collection of tables keyed by unique table name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Table>", into = "Vec<Table>")]
pub struct TableSet {
    tables: IndexMap<String, Table>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table. A table with the same name is replaced in place.
    pub fn insert(&mut self, table: Table) -> &Table {
        let (idx, _) = self.tables.insert_full(table.name.clone(), table);
        &self.tables[idx]
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Table> {
        self.tables.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Tables in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }
}

/// Table names must be unique; a repeated name is rejected, not merged.
impl TryFrom<Vec<Table>> for TableSet {
    type Error = ConvertError;

    fn try_from(tables: Vec<Table>) -> ConvertResult<Self> {
        let mut set = TableSet::new();
        for table in tables {
            if set.contains(&table.name) {
                return Err(ConvertError::InvalidArgument(format!(
                    "Duplicate table name '{}'",
                    table.name
                )));
            }
            set.insert(table);
        }
        Ok(set)
    }
}

impl From<TableSet> for Vec<Table> {
    fn from(set: TableSet) -> Self {
        set.tables.into_values().collect()
    }
}
