use super::*;
use crate::parser::parse_table_set;
use crate::types::{Column, Row};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

/// Workbook with a "page" sheet holding a header row and two records
fn write_source(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("source.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("page").unwrap();
    sheet.write_string(0, 0, "Item").unwrap();
    sheet.write_string(0, 1, "Qty").unwrap();
    sheet.write_string(1, 0, "bolt").unwrap();
    sheet.write_number(1, 1, 40.0).unwrap();
    sheet.write_string(2, 0, "nut").unwrap();
    sheet.write_number(2, 1, 2.5).unwrap();
    workbook.save(&path).unwrap();
    path
}

#[test]
fn test_describe_table() {
    let mut table = Table::new("stock");
    table.add_column(Column::new("item"));
    table.add_column(Column::decimal("qty"));
    table.add_row(Row::from_iter(["bolt", "40"])).unwrap();

    assert_eq!(
        describe_table(&table),
        "stock: 2 columns, 1 rows [item (text), qty (decimal)]"
    );
}

#[test]
fn test_convert_writes_output_workbook() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir);
    let output = dir.path().join("converted.xlsx");

    convert(input, None, Some(output.clone()), None, false).unwrap();
    assert!(output.exists(), "Output file should exist");
}

#[test]
fn test_convert_defaults_to_tagged_output_in_dir() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir);
    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();

    convert(input, None, None, Some(out_dir.clone()), true).unwrap();

    let produced: Vec<_> = std::fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(produced.len(), 1);
    assert!(produced[0].starts_with("source_"));
    assert!(produced[0].ends_with(".xlsx"));
}

#[test]
fn test_convert_missing_sheet_reports_context() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir);

    let err = convert(
        input,
        Some("Totals".to_string()),
        Some(dir.path().join("never.xlsx")),
        None,
        false,
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("Error importing worksheet Totals"));
    assert!(!dir.path().join("never.xlsx").exists());
}

#[test]
fn test_import_then_export() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir);
    let yaml = dir.path().join("tables.yaml");
    let xlsx = dir.path().join("again.xlsx");

    import(input, yaml.clone(), Some(" PAGE ".to_string()), None, true).unwrap();

    let tables = parse_table_set(&yaml).unwrap();
    let table = tables.get("PAGE").unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.field(0, "Qty"), "40");
    assert_eq!(table.field(1, "Qty"), "2.5");

    export(yaml, xlsx.clone(), true).unwrap();
    assert!(xlsx.exists());
}

#[test]
fn test_sheets_lists_names() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir);
    assert!(sheets(input).is_ok());
    assert!(sheets(dir.path().join("missing.xlsx")).is_err());
}
