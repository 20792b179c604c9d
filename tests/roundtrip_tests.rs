//! Round trips through real .xlsx files: export a table set with the Excel
//! engine, then import every sheet back.

use pretty_assertions::assert_eq;
use royalbit_gridtable::engine::{ExcelEngine, GridSource, Session};
use royalbit_gridtable::{
    export_table_set_to_file, import_sheet_to_table, Column, ConvertError, Row, Table, TableSet,
};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use tempfile::TempDir;

fn inventory() -> Table {
    let mut table = Table::new("Inventory");
    table.add_column(Column::new("Sku"));
    table.add_column(Column::new("Label"));
    table.add_column(Column::decimal("Price"));
    table.add_row(Row::from_iter(["A-1", "Bolt", "0.5"])).unwrap();
    table.add_row(Row::from_iter(["A-2", "", "12.345"])).unwrap();
    table.add_row(Row::from_iter(["A-3", "Nut, hex", "7"])).unwrap();
    table
}

fn notes() -> Table {
    let mut table = Table::new("Notes");
    table.add_column(Column::new("Text"));
    table.add_row(Row::from_iter(["first"])).unwrap();
    table.add_row(Row::from_iter(["second line"])).unwrap();
    table
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORT THEN IMPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_roundtrip_preserves_names_rows_and_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roundtrip.xlsx");

    let mut original = TableSet::new();
    original.insert(inventory());
    original.insert(notes());

    let mut session: Session<ExcelEngine> = Session::new();
    export_table_set_to_file(&mut session, &original, &path).unwrap();
    assert!(path.exists(), "Excel file should be created");

    let mut imported = TableSet::new();
    for table in original.iter() {
        import_sheet_to_table(&mut session, &mut imported, &path, &table.name, &table.name)
            .unwrap();
    }
    session.close();

    let notes_back = imported.get("Notes").unwrap();
    assert_eq!(notes_back.column_names().collect::<Vec<_>>(), vec!["Text"]);
    assert_eq!(notes_back.rows, notes().rows);

    let inventory_back = imported.get("Inventory").unwrap();
    assert_eq!(
        inventory_back.column_names().collect::<Vec<_>>(),
        vec!["Sku", "Label", "Price"]
    );
    assert_eq!(inventory_back.row_count(), 3);
    assert_eq!(inventory_back.field(0, "Sku"), "A-1");
    assert_eq!(inventory_back.field(1, "Label"), "");
    assert_eq!(inventory_back.field(2, "Label"), "Nut, hex");
}

#[test]
fn test_roundtrip_decimals_compare_after_rounding() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("decimals.xlsx");

    let mut original = TableSet::new();
    original.insert(inventory());

    let mut session: Session<ExcelEngine> = Session::new();
    export_table_set_to_file(&mut session, &original, &path).unwrap();

    let mut imported = TableSet::new();
    let back = import_sheet_to_table(&mut session, &mut imported, &path, "inventory", "inv")
        .unwrap();

    assert_eq!(back.field(0, "Price"), "00.50");
    assert_eq!(back.field(1, "Price"), "12.34");
    assert_eq!(back.field(2, "Price"), "07.00");

    let source = original.get("Inventory").unwrap();
    for row in 0..source.row_count() {
        assert_eq!(
            back.number(row, "Price", Some(2)),
            source.number(row, "Price", Some(2)),
            "row {}",
            row
        );
    }
}

#[test]
fn test_exported_sheet_names_match_tables() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("names.xlsx");

    let mut original = TableSet::new();
    original.insert(notes());
    original.insert(inventory());

    let mut session: Session<ExcelEngine> = Session::new();
    export_table_set_to_file(&mut session, &original, &path).unwrap();

    let engine = session.engine_mut().unwrap();
    let workbook = engine.open_workbook(&path).unwrap();
    assert_eq!(engine.list_sheets(&workbook), vec!["Notes", "Inventory"]);
    engine.close_workbook(workbook);
}

// ═══════════════════════════════════════════════════════════════════════════
// IMPORT FROM NATIVE CELLS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_import_numbers_and_dates_as_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("native.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Page").unwrap();
    sheet.write_string(0, 0, "Count").unwrap();
    sheet.write_string(0, 1, "Ratio").unwrap();
    sheet.write_string(0, 2, "Stamp").unwrap();
    sheet.write_number(1, 0, 42.0).unwrap();
    sheet.write_number(1, 1, 0.125).unwrap();
    let stamp = ExcelDateTime::from_ymd(2023, 12, 5)
        .unwrap()
        .and_hms(14, 7, 9)
        .unwrap();
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    sheet
        .write_datetime_with_format(1, 2, &stamp, &date_format)
        .unwrap();
    workbook.save(&path).unwrap();

    let mut session: Session<ExcelEngine> = Session::new();
    let mut tables = TableSet::new();
    let table = import_sheet_to_table(&mut session, &mut tables, &path, "page", "page").unwrap();

    assert_eq!(
        table.rows[0].cells,
        vec!["42", "0.125", "12/05/2023 14:07:09"]
    );
}

#[test]
fn test_import_missing_file_is_source_unavailable() {
    let dir = TempDir::new().unwrap();
    let mut session: Session<ExcelEngine> = Session::new();
    let mut tables = TableSet::new();

    let err = import_sheet_to_table(
        &mut session,
        &mut tables,
        &dir.path().join("missing.xlsx"),
        "page",
        "page",
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::SourceUnavailable(_)));
}
