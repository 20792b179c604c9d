//! Excel engine: calamine for reading, rust_xlsxwriter for writing.

use super::{Engine, GridSink, GridSource};
use crate::error::{ConvertError, ConvertResult};
use crate::grid::{CellRange, Grid, RawCell};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::Workbook;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stateless engine for .xlsx/.xlsm/.xls/.ods files on disk
#[derive(Debug, Default)]
pub struct ExcelEngine;

impl ExcelEngine {
    pub fn new() -> Self {
        Self
    }
}

/// An open source workbook
pub struct SourceWorkbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
    names: Vec<String>,
}

/// A workbook being built for saving as .xlsx
pub struct XlsxOutput {
    workbook: Workbook,
    sheet_count: usize,
}

impl GridSource for ExcelEngine {
    type Workbook = SourceWorkbook;

    fn open_workbook(&mut self, path: &Path) -> ConvertResult<SourceWorkbook> {
        let sheets = open_workbook_auto(path).map_err(|e| {
            ConvertError::SourceUnavailable(format!(
                "Failed to open Excel file {}: {}",
                path.display(),
                e
            ))
        })?;
        let names = sheets.sheet_names().to_vec();
        debug!(path = %path.display(), sheets = names.len(), "opened workbook");

        Ok(SourceWorkbook {
            path: path.to_path_buf(),
            sheets,
            names,
        })
    }

    fn list_sheets(&self, workbook: &SourceWorkbook) -> Vec<String> {
        workbook.names.clone()
    }

    fn read_used_range(
        &mut self,
        workbook: &mut SourceWorkbook,
        sheet_index: usize,
    ) -> ConvertResult<Grid> {
        let name = workbook.names.get(sheet_index).cloned().ok_or_else(|| {
            ConvertError::SourceUnavailable(format!(
                "Sheet index {} out of range in {}",
                sheet_index,
                workbook.path.display()
            ))
        })?;

        let range = workbook.sheets.worksheet_range(&name).map_err(|e| {
            ConvertError::SourceUnavailable(format!(
                "Failed to read sheet '{}' from {}: {}",
                name,
                workbook.path.display(),
                e
            ))
        })?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(convert_cell).collect())
            .collect();
        Ok(Grid::from_rows(rows))
    }

    fn close_workbook(&mut self, workbook: SourceWorkbook) {
        debug!(path = %workbook.path.display(), "closed workbook");
    }
}

/// Map a calamine cell onto the converter's cell kinds
fn convert_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Bool(b) => RawCell::Boolean(*b),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                RawCell::Duration(dt.as_f64().to_string())
            } else {
                // Out-of-range serials stay numbers
                dt.as_datetime()
                    .map(RawCell::DateTime)
                    .unwrap_or(RawCell::Number(dt.as_f64()))
            }
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(RawCell::DateTime)
            .unwrap_or_else(|| RawCell::Text(s.clone())),
        Data::DurationIso(s) => RawCell::Duration(s.clone()),
        Data::Error(e) => RawCell::Error(e.to_string()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn sink_error(what: &str, e: impl std::fmt::Display) -> ConvertError {
    ConvertError::SinkFailure(format!("Failed to {}: {}", what, e))
}

impl GridSink for ExcelEngine {
    type Output = XlsxOutput;

    fn create_workbook(&mut self) -> ConvertResult<XlsxOutput> {
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        Ok(XlsxOutput {
            workbook,
            sheet_count: 1,
        })
    }

    fn sheet_count(&self, workbook: &XlsxOutput) -> usize {
        workbook.sheet_count
    }

    fn add_sheet(&mut self, workbook: &mut XlsxOutput, after: usize) -> ConvertResult<usize> {
        // rust_xlsxwriter keeps sheets in creation order
        if after + 1 != workbook.sheet_count {
            return Err(ConvertError::SinkFailure(format!(
                "Sheets can only be appended (after sheet {}, workbook has {})",
                after, workbook.sheet_count
            )));
        }
        workbook.workbook.add_worksheet();
        workbook.sheet_count += 1;
        Ok(workbook.sheet_count - 1)
    }

    fn rename_sheet(
        &mut self,
        workbook: &mut XlsxOutput,
        sheet_index: usize,
        name: &str,
    ) -> ConvertResult<()> {
        let worksheet = workbook
            .workbook
            .worksheet_from_index(sheet_index)
            .map_err(|e| sink_error("find worksheet", e))?;
        worksheet.set_name(name).map_err(|e| {
            ConvertError::InvalidName(format!("Failed to set worksheet name '{}': {}", name, e))
        })?;
        Ok(())
    }

    fn write_range(
        &mut self,
        workbook: &mut XlsxOutput,
        sheet_index: usize,
        range: CellRange,
        values: &[Vec<String>],
    ) -> ConvertResult<()> {
        if values.len() != range.rows() || values.iter().any(|r| r.len() != range.cols()) {
            return Err(ConvertError::SinkFailure(format!(
                "Value block does not match range {}",
                range
            )));
        }

        let worksheet = workbook
            .workbook
            .worksheet_from_index(sheet_index)
            .map_err(|e| sink_error("find worksheet", e))?;

        // Worksheet API is 0-indexed
        let row = u32::try_from(range.top_left.row - 1)
            .map_err(|e| sink_error("address row", e))?;
        let col = u16::try_from(range.top_left.col - 1)
            .map_err(|e| sink_error("address column", e))?;

        worksheet
            .write_row_matrix(
                row,
                col,
                values.iter().map(|r| r.iter().map(String::as_str)),
            )
            .map_err(|e| sink_error("write range", e))?;
        Ok(())
    }

    fn save_as(&mut self, workbook: &mut XlsxOutput, path: &Path) -> ConvertResult<()> {
        workbook
            .workbook
            .save(path)
            .map_err(|e| sink_error("save Excel file", e))?;
        debug!(path = %path.display(), "saved workbook");
        Ok(())
    }

    fn close_output(&mut self, _workbook: XlsxOutput, _discard_changes: bool) {}
}

impl Engine for ExcelEngine {
    fn launch() -> ConvertResult<Self> {
        Ok(Self::new())
    }

    fn quit(&mut self) {}
}
