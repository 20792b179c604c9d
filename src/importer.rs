//! Grid → Table importer

use crate::coerce::coerce_to_text;
use crate::engine::{Engine, GridSource, Session};
use crate::error::{require_non_empty, ConvertError, ConvertResult};
use crate::format::is_same;
use crate::grid::Grid;
use crate::types::{Column, Row, Table, TableSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Worksheet read when the caller names none
pub const DEFAULT_WORKSHEET: &str = "page";

/// Build a table from a raw grid whose first row holds the headers.
///
/// Header quirk: the header scan stops at the first blank header cell and
/// every column from there on is dropped, even if later header cells are
/// filled. This is not a sparse-header policy and must not become one; the
/// resulting table width is relied upon downstream. A blank first header
/// therefore yields a table with no columns and no rows.
///
/// Header cells go through `coerce_to_text`, so a numeric or date header
/// (e.g. `2024`) is kept as its text form. Legacy exports only accepted
/// string header cells and stopped the scan at any other kind; such sheets
/// may import wider here.
pub fn import_grid(grid: &Grid, table_name: &str) -> Table {
    let mut table = Table::new(table_name);

    for col in 1..=grid.width() {
        let header = coerce_to_text(grid.get(1, col));
        if header.is_empty() {
            debug!(column = col, "blank header, truncating table width");
            break;
        }
        table.add_column(Column::new(header));
    }

    let width = table.column_count();
    if width == 0 {
        return table;
    }

    // Every row has exactly `width` cells, so push directly
    for row in 2..=grid.height() {
        let cells = (1..=width)
            .map(|col| coerce_to_text(grid.get(row, col)))
            .collect();
        table.rows.push(Row::new(cells));
    }

    table
}

/// Index of the first sheet whose name matches `requested`, ignoring case
/// and surrounding whitespace.
pub fn find_sheet(sheet_names: &[String], requested: &str) -> Option<usize> {
    sheet_names.iter().position(|name| is_same(name, requested))
}

/// Read the used range of the first sheet matching `sheet_name`.
/// The workbook is closed whether or not the read succeeds.
pub fn read_sheet<S: GridSource>(
    source: &mut S,
    path: &Path,
    sheet_name: &str,
) -> ConvertResult<Option<Grid>> {
    let mut workbook = source.open_workbook(path)?;
    let result = scan_workbook(source, &mut workbook, sheet_name);
    source.close_workbook(workbook);
    result
}

fn scan_workbook<S: GridSource>(
    source: &mut S,
    workbook: &mut S::Workbook,
    sheet_name: &str,
) -> ConvertResult<Option<Grid>> {
    let names = source.list_sheets(workbook);
    match find_sheet(&names, sheet_name) {
        Some(index) => {
            debug!(sheet = %names[index], index, "reading used range");
            source.read_used_range(workbook, index).map(Some)
        }
        None => {
            warn!(sheet = sheet_name, available = ?names, "no matching worksheet");
            Ok(None)
        }
    }
}

/// Import one sheet of the workbook at `path` as a table named `table_name`.
///
/// Fails with `EmptyResult` if no sheet matches or the sheet yields no rows.
pub fn import_sheet<S: GridSource>(
    source: &mut S,
    path: &Path,
    sheet_name: &str,
    table_name: &str,
) -> ConvertResult<Table> {
    let grid = read_sheet(source, path, sheet_name)?.ok_or_else(|| {
        ConvertError::EmptyResult(format!(
            "No worksheet '{}' within the file {}",
            sheet_name,
            path.display()
        ))
    })?;

    let table = import_grid(&grid, table_name);
    if table.row_count() == 0 {
        return Err(ConvertError::EmptyResult(format!(
            "No records available within the file {}, worksheet {}",
            path.display(),
            sheet_name
        )));
    }
    Ok(table)
}

/// Import a sheet into `tables` under `table_name`, replacing any table of
/// that name.
///
/// An existing table with rows is cleared before the read starts. If the
/// import then fails, the table is left empty rather than restored.
pub fn import_sheet_to_table<'a, E: Engine>(
    session: &mut Session<E>,
    tables: &'a mut TableSet,
    path: &Path,
    sheet_name: &str,
    table_name: &str,
) -> ConvertResult<&'a Table> {
    require_non_empty(&path.to_string_lossy(), "file path")?;
    require_non_empty(sheet_name, "worksheet name")?;
    require_non_empty(table_name, "table name")?;

    if let Some(existing) = tables.get_mut(table_name) {
        if existing.row_count() > 0 {
            debug!(table = table_name, rows = existing.row_count(), "clearing table before reimport");
            existing.clear();
        }
    }

    let engine = session.engine_mut()?;
    let table = import_sheet(engine, path, sheet_name, table_name)?;
    info!(
        table = table_name,
        columns = table.column_count(),
        rows = table.row_count(),
        "imported worksheet {}",
        sheet_name
    );
    Ok(tables.insert(table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RawCell;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    #[test]
    fn test_header_scan_stops_at_first_blank() {
        let grid = Grid::from_rows(vec![
            vec![text("Name"), text("Qty"), RawCell::Empty, text("Ignored")],
            vec![text("apple"), RawCell::Number(3.0), text("x"), text("y")],
        ]);
        let table = import_grid(&grid, "page");

        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["Name", "Qty"]);
        assert_eq!(table.rows[0].cells, vec!["apple", "3"]);
    }

    #[test]
    fn test_empty_string_header_also_truncates() {
        let grid = Grid::from_rows(vec![
            vec![text("A"), text(""), text("C")],
            vec![text("1"), text("2"), text("3")],
        ]);
        assert_eq!(import_grid(&grid, "t").column_count(), 1);
    }

    #[test]
    fn test_blank_first_header_gives_empty_table() {
        let grid = Grid::from_rows(vec![
            vec![RawCell::Empty, text("B")],
            vec![text("1"), text("2")],
            vec![text("3"), text("4")],
        ]);
        let table = import_grid(&grid, "t");
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_numeric_header_uses_text_form() {
        let grid = Grid::from_rows(vec![
            vec![RawCell::Number(2024.0), text("Label")],
            vec![text("a"), text("b")],
        ]);
        let table = import_grid(&grid, "t");
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["2024", "Label"]);
    }

    #[test]
    fn test_rows_keep_source_order_and_blank_cells() {
        let grid = Grid::from_rows(vec![
            vec![text("A"), text("B")],
            vec![text("r1"), RawCell::Empty],
            vec![RawCell::Empty, RawCell::Boolean(true)],
            vec![text("r3")],
        ]);
        let table = import_grid(&grid, "t");

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[0].cells, vec!["r1", ""]);
        assert_eq!(table.rows[1].cells, vec!["", ""]);
        assert_eq!(table.rows[2].cells, vec!["r3", ""]);
        assert!(table.validate_lengths().is_ok());
    }

    #[test]
    fn test_header_only_grid_has_no_rows() {
        let grid = Grid::from_rows(vec![vec![text("A")]]);
        let table = import_grid(&grid, "t");
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_find_sheet_is_case_and_space_insensitive() {
        let names = vec![
            "Summary".to_string(),
            " PAGE ".to_string(),
            "page".to_string(),
        ];
        assert_eq!(find_sheet(&names, "page"), Some(1));
        assert_eq!(find_sheet(&names, "  summary"), Some(0));
        assert_eq!(find_sheet(&names, "missing"), None);
    }
}
