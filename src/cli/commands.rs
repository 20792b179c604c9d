use crate::cli::display::{display, display_notification, display_warning};
use crate::config::{table_name_for_sheet, RunConfig};
use crate::engine::{ExcelEngine, GridSource, Session};
use crate::exporter::export_table_set_to_file;
use crate::importer::{import_sheet_to_table, DEFAULT_WORKSHEET};
use crate::parser::parse_table_set;
use crate::types::{Table, TableSet};
use crate::writer::write_table_set;
use anyhow::Context;
use chrono::Local;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// One line per column: `name (kind)`
fn describe_table(table: &Table) -> String {
    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("{} ({})", c.name, c.kind.as_str()))
        .collect();
    format!(
        "{}: {} columns, {} rows [{}]",
        table.name,
        table.column_count(),
        table.row_count(),
        columns.join(", ")
    )
}

/// Import one worksheet into a fresh table set under `table_name`.
fn import_into_set(
    session: &mut Session<ExcelEngine>,
    input: &Path,
    worksheet: &str,
    table_name: &str,
) -> anyhow::Result<TableSet> {
    let mut tables = TableSet::new();
    import_sheet_to_table(session, &mut tables, input, worksheet, table_name).with_context(
        || {
            format!(
                "Error importing worksheet {} from Excel file {}",
                worksheet,
                input.display()
            )
        },
    )?;
    Ok(tables)
}

/// Execute the convert command: worksheet → table → new tagged workbook
pub fn convert(
    input: PathBuf,
    worksheet: Option<String>,
    output: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    verbose: bool,
) -> anyhow::Result<()> {
    let config = RunConfig::resolve(
        input,
        worksheet,
        output,
        output_dir,
        Local::now().naive_local(),
    )?;

    println!("{}", "📊 GridTable - Convert".bold().green());
    display(&format!(
        "Importing worksheet {} from file {}",
        config.worksheet,
        config.input.display()
    ));

    let mut session: Session<ExcelEngine> = Session::new();
    let tables = import_into_set(
        &mut session,
        &config.input,
        &config.worksheet,
        &config.table_name,
    )?;

    if let Some(table) = tables.get(&config.table_name) {
        display(&format!(
            "Imported {} records from worksheet {}",
            table.row_count(),
            config.worksheet
        ));
        if verbose {
            println!("   {}", describe_table(table).cyan());
        }
    }

    export_table_set_to_file(&mut session, &tables, &config.output).with_context(|| {
        format!("Error exporting data-set to Excel {}", config.output.display())
    })?;
    session.close();

    display_notification(&format!("\nSee export file: {}", config.output.display()));
    Ok(())
}

/// Execute the import command: worksheet → YAML/JSON table set file
pub fn import(
    input: PathBuf,
    output: PathBuf,
    worksheet: Option<String>,
    table: Option<String>,
    verbose: bool,
) -> anyhow::Result<()> {
    let worksheet = worksheet.unwrap_or_else(|| DEFAULT_WORKSHEET.to_string());
    let table_name = table.unwrap_or_else(|| table_name_for_sheet(&worksheet));

    println!("{}", "📊 GridTable - Excel Import".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    let mut session: Session<ExcelEngine> = Session::new();
    let tables = import_into_set(&mut session, &input, &worksheet, &table_name)?;
    session.close();

    if verbose {
        for table in tables.iter() {
            println!("   {}", describe_table(table).cyan());
        }
    }

    write_table_set(&output, &tables)
        .with_context(|| format!("Error writing table set to {}", output.display()))?;

    display_notification(&format!("✅ Table set written to {}", output.display()));
    Ok(())
}

/// Execute the export command: YAML/JSON table set file → workbook
pub fn export(input: PathBuf, output: PathBuf, verbose: bool) -> anyhow::Result<()> {
    println!("{}", "📊 GridTable - Excel Export".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    let tables = parse_table_set(&input)
        .with_context(|| format!("Error reading table set from {}", input.display()))?;

    if verbose {
        for table in tables.iter() {
            println!("   {}", describe_table(table).cyan());
        }
    }
    if tables.iter().any(|t| t.row_count() == 0) {
        display_warning("⚠️  Some tables have no rows; their sheets hold headers only");
    }

    let mut session: Session<ExcelEngine> = Session::new();
    export_table_set_to_file(&mut session, &tables, &output)
        .with_context(|| format!("Error exporting data-set to Excel {}", output.display()))?;
    session.close();

    display_notification(&format!(
        "✅ Exported {} sheet(s) to {}",
        tables.len(),
        output.display()
    ));
    Ok(())
}

/// Execute the sheets command: list worksheet names
pub fn sheets(input: PathBuf) -> anyhow::Result<()> {
    let mut session: Session<ExcelEngine> = Session::new();
    let engine = session.engine_mut()?;

    let workbook = engine
        .open_workbook(&input)
        .with_context(|| format!("Error opening Excel file {}", input.display()))?;
    let names = engine.list_sheets(&workbook);
    engine.close_workbook(workbook);
    session.close();

    println!("{}", format!("Worksheets in {}:", input.display()).bold());
    for (idx, name) in names.iter().enumerate() {
        println!("   {}. {}", idx + 1, name.bright_blue());
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
