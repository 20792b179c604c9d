//! Table → Grid exporter

use crate::coerce::coerce_cell_for_export;
use crate::engine::{Engine, GridSink, Session};
use crate::error::{require_non_empty, ConvertError, ConvertResult};
use crate::grid::CellRange;
use crate::types::{Table, TableSet};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Longest sheet name Excel accepts
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Sheet name Excel reserves for itself
const RESERVED_SHEET_NAME: &str = "History";

/// A table laid out for one bulk write: header row then data rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetGrid {
    pub name: String,
    pub values: Vec<Vec<String>>,
}

impl SheetGrid {
    /// Header row included
    pub fn rows(&self) -> usize {
        self.values.len()
    }

    pub fn cols(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }
}

fn invalid_sheet_chars() -> ConvertResult<Regex> {
    Regex::new(r"[\[\]:*?/\\]")
        .map_err(|e| ConvertError::InvalidName(format!("Regex error: {}", e)))
}

/// Check `name` can be used as a worksheet name.
pub fn validate_sheet_name(name: &str) -> ConvertResult<()> {
    check_sheet_name(name, &invalid_sheet_chars()?)
}

fn check_sheet_name(name: &str, invalid_chars: &Regex) -> ConvertResult<()> {
    let problem = if name.trim().is_empty() {
        Some("must not be blank")
    } else if name.chars().count() > MAX_SHEET_NAME_LEN {
        Some("must be 31 characters or fewer")
    } else if invalid_chars.is_match(name) {
        Some("must not contain any of [ ] : * ? / \\")
    } else if name.starts_with('\'') || name.ends_with('\'') {
        Some("must not start or end with an apostrophe")
    } else if name.eq_ignore_ascii_case(RESERVED_SHEET_NAME) {
        Some("is reserved")
    } else {
        None
    };

    match problem {
        Some(reason) => Err(ConvertError::InvalidName(format!(
            "'{}' {}",
            name, reason
        ))),
        None => Ok(()),
    }
}

/// Lay out one table: row 0 holds the column names verbatim, rows 1.. hold
/// the cells rendered for export (decimal columns forced to two decimals).
pub fn export_table(table: &Table) -> ConvertResult<SheetGrid> {
    table
        .validate_lengths()
        .map_err(ConvertError::InvalidArgument)?;

    let mut values = Vec::with_capacity(table.row_count() + 1);
    values.push(table.column_names().map(str::to_string).collect());
    for row in &table.rows {
        values.push(
            row.cells
                .iter()
                .zip(&table.columns)
                .map(|(cell, column)| coerce_cell_for_export(cell, column.kind))
                .collect(),
        );
    }

    Ok(SheetGrid {
        name: table.name.clone(),
        values,
    })
}

/// Lay out every table of the set, in set order, one sheet per table.
pub fn export(tables: &TableSet) -> ConvertResult<Vec<SheetGrid>> {
    if tables.is_empty() {
        return Err(ConvertError::EmptyResult(
            "Table set has no tables to export".to_string(),
        ));
    }

    // Check the names that get written; a table renamed in place no longer
    // matches its key. Excel compares sheet names case-insensitively.
    let invalid_chars = invalid_sheet_chars()?;
    let mut seen = HashSet::new();
    for name in tables.iter().map(|t| t.name.as_str()) {
        check_sheet_name(name, &invalid_chars)?;
        if !seen.insert(name.to_lowercase()) {
            return Err(ConvertError::InvalidName(format!(
                "'{}' collides with another table's sheet name",
                name
            )));
        }
    }

    tables.iter().map(export_table).collect()
}

/// Write sheets into a new workbook and save it at `path`.
///
/// The workbook's default first sheet takes the first grid; each further
/// grid gets a sheet appended after the last one. Each sheet receives exactly
/// one bulk range write. The workbook is closed on every path.
pub fn write_sheets<S: GridSink>(
    sink: &mut S,
    sheets: &[SheetGrid],
    path: &Path,
) -> ConvertResult<()> {
    let mut workbook = sink.create_workbook()?;
    let result = fill_workbook(sink, &mut workbook, sheets, path);
    sink.close_output(workbook, result.is_err());
    result
}

fn fill_workbook<S: GridSink>(
    sink: &mut S,
    workbook: &mut S::Output,
    sheets: &[SheetGrid],
    path: &Path,
) -> ConvertResult<()> {
    for (idx, sheet) in sheets.iter().enumerate() {
        let sheet_index = if idx == 0 {
            0
        } else {
            let last = sink.sheet_count(workbook) - 1;
            sink.add_sheet(workbook, last)?
        };
        sink.rename_sheet(workbook, sheet_index, &sheet.name)?;

        if sheet.cols() == 0 {
            debug!(sheet = %sheet.name, "table has no columns, sheet left blank");
            continue;
        }
        let range = CellRange::from_origin(sheet.rows(), sheet.cols());
        debug!(sheet = %sheet.name, %range, "writing range");
        sink.write_range(workbook, sheet_index, range, &sheet.values)?;
    }

    sink.save_as(workbook, path)
}

/// Export every table of `tables` to a new workbook at `path`.
pub fn export_table_set_to_file<E: Engine>(
    session: &mut Session<E>,
    tables: &TableSet,
    path: &Path,
) -> ConvertResult<()> {
    require_non_empty(&path.to_string_lossy(), "output file path")?;
    let sheets = export(tables)?;

    let engine = session.engine_mut()?;
    write_sheets(engine, &sheets, path)?;
    info!(
        sheets = sheets.len(),
        path = %path.display(),
        "exported table set"
    );
    Ok(())
}
