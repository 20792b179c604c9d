//! In-memory engine. Workbooks live in a map keyed by path and every bulk
//! write is recorded, which makes it suitable for dry runs and tests.

use super::{Engine, GridSink, GridSource};
use crate::error::{ConvertError, ConvertResult};
use crate::grid::{CellRange, Grid, RawCell};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A named sheet and its cells, row-major from A1
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySheet {
    pub name: String,
    pub cells: Vec<Vec<RawCell>>,
}

impl MemorySheet {
    pub fn new(name: impl Into<String>, cells: Vec<Vec<RawCell>>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Bounding box of the non-empty cells
    pub fn used_range(&self) -> Grid {
        let is_used = |cell: &RawCell| !matches!(cell, RawCell::Empty);

        let mut rows = (usize::MAX, 0);
        let mut cols = (usize::MAX, 0);
        for (r, row) in self.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if is_used(cell) {
                    rows = (rows.0.min(r), rows.1.max(r + 1));
                    cols = (cols.0.min(c), cols.1.max(c + 1));
                }
            }
        }
        if rows.1 == 0 {
            return Grid::default();
        }

        let used = self.cells[rows.0..rows.1]
            .iter()
            .map(|row| {
                (cols.0..cols.1)
                    .map(|c| row.get(c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Grid::from_rows(used)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryWorkbook {
    pub sheets: Vec<MemorySheet>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: impl Into<String>, cells: Vec<Vec<RawCell>>) -> Self {
        self.sheets.push(MemorySheet::new(name, cells));
        self
    }

    pub fn sheet(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// A recorded bulk write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteCall {
    pub sheet_index: usize,
    pub sheet_name: String,
    pub range: CellRange,
}

/// A workbook under construction
#[derive(Debug, Default)]
pub struct MemoryOutput {
    sheets: Vec<(String, Vec<Vec<String>>)>,
}

#[derive(Debug, Default)]
pub struct MemoryEngine {
    files: HashMap<PathBuf, MemoryWorkbook>,
    writes: Vec<WriteCall>,
    open_workbooks: usize,
    fail_saves: bool,
    quits: Rc<Cell<usize>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a workbook that `open_workbook(path)` will find.
    pub fn with_workbook(mut self, path: impl Into<PathBuf>, workbook: MemoryWorkbook) -> Self {
        self.files.insert(path.into(), workbook);
        self
    }

    /// Make every `save_as` fail.
    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn workbook(&self, path: impl AsRef<Path>) -> Option<&MemoryWorkbook> {
        self.files.get(path.as_ref())
    }

    pub fn writes(&self) -> &[WriteCall] {
        &self.writes
    }

    /// Source workbooks opened and not yet closed
    pub fn open_workbooks(&self) -> usize {
        self.open_workbooks
    }

    /// Shared count of `quit` calls, readable after the engine is gone
    pub fn quit_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.quits)
    }
}

fn sheet_mut<'a>(
    output: &'a mut MemoryOutput,
    sheet_index: usize,
) -> ConvertResult<&'a mut (String, Vec<Vec<String>>)> {
    let count = output.sheets.len();
    output.sheets.get_mut(sheet_index).ok_or_else(|| {
        ConvertError::SinkFailure(format!(
            "Sheet index {} out of range ({} sheets)",
            sheet_index, count
        ))
    })
}

impl GridSource for MemoryEngine {
    type Workbook = MemoryWorkbook;

    fn open_workbook(&mut self, path: &Path) -> ConvertResult<MemoryWorkbook> {
        let workbook = self.files.get(path).cloned().ok_or_else(|| {
            ConvertError::SourceUnavailable(format!("No such workbook: {}", path.display()))
        })?;
        self.open_workbooks += 1;
        Ok(workbook)
    }

    fn list_sheets(&self, workbook: &MemoryWorkbook) -> Vec<String> {
        workbook.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn read_used_range(
        &mut self,
        workbook: &mut MemoryWorkbook,
        sheet_index: usize,
    ) -> ConvertResult<Grid> {
        workbook
            .sheets
            .get(sheet_index)
            .map(MemorySheet::used_range)
            .ok_or_else(|| {
                ConvertError::SourceUnavailable(format!("Sheet index {} out of range", sheet_index))
            })
    }

    fn close_workbook(&mut self, _workbook: MemoryWorkbook) {
        self.open_workbooks = self.open_workbooks.saturating_sub(1);
    }
}

impl GridSink for MemoryEngine {
    type Output = MemoryOutput;

    fn create_workbook(&mut self) -> ConvertResult<MemoryOutput> {
        Ok(MemoryOutput {
            sheets: vec![("Sheet1".to_string(), Vec::new())],
        })
    }

    fn sheet_count(&self, workbook: &MemoryOutput) -> usize {
        workbook.sheets.len()
    }

    fn add_sheet(&mut self, workbook: &mut MemoryOutput, after: usize) -> ConvertResult<usize> {
        if after >= workbook.sheets.len() {
            return Err(ConvertError::SinkFailure(format!(
                "Cannot add a sheet after index {}",
                after
            )));
        }
        let name = format!("Sheet{}", workbook.sheets.len() + 1);
        workbook.sheets.insert(after + 1, (name, Vec::new()));
        Ok(after + 1)
    }

    fn rename_sheet(
        &mut self,
        workbook: &mut MemoryOutput,
        sheet_index: usize,
        name: &str,
    ) -> ConvertResult<()> {
        sheet_mut(workbook, sheet_index)?.0 = name.to_string();
        Ok(())
    }

    fn write_range(
        &mut self,
        workbook: &mut MemoryOutput,
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

        let (name, cells) = sheet_mut(workbook, sheet_index)?;
        let bottom = range.bottom_right.row;
        let right = range.bottom_right.col;
        if cells.len() < bottom {
            cells.resize(bottom, Vec::new());
        }
        for (offset, row_values) in values.iter().enumerate() {
            let row = &mut cells[range.top_left.row - 1 + offset];
            if row.len() < right {
                row.resize(right, String::new());
            }
            for (c, value) in row_values.iter().enumerate() {
                row[range.top_left.col - 1 + c] = value.clone();
            }
        }

        self.writes.push(WriteCall {
            sheet_index,
            sheet_name: name.clone(),
            range,
        });
        Ok(())
    }

    fn save_as(&mut self, workbook: &mut MemoryOutput, path: &Path) -> ConvertResult<()> {
        if self.fail_saves {
            return Err(ConvertError::SinkFailure(format!(
                "Cannot save {}",
                path.display()
            )));
        }

        // Written strings read back as text; empty strings as empty cells
        let saved = MemoryWorkbook {
            sheets: workbook
                .sheets
                .iter()
                .map(|(name, rows)| {
                    let cells = rows
                        .iter()
                        .map(|row| {
                            row.iter()
                                .map(|v| {
                                    if v.is_empty() {
                                        RawCell::Empty
                                    } else {
                                        RawCell::Text(v.clone())
                                    }
                                })
                                .collect()
                        })
                        .collect();
                    MemorySheet::new(name.clone(), cells)
                })
                .collect(),
        };
        self.files.insert(path.to_path_buf(), saved);
        Ok(())
    }

    fn close_output(&mut self, _workbook: MemoryOutput, _discard_changes: bool) {}
}

impl Engine for MemoryEngine {
    fn launch() -> ConvertResult<Self> {
        Ok(Self::new())
    }

    fn quit(&mut self) {
        self.quits.set(self.quits.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_used_range_trims_empty_border() {
        let sheet = MemorySheet::new(
            "s",
            vec![
                vec![RawCell::Empty, RawCell::Empty, RawCell::Empty],
                vec![RawCell::Empty, "a".into(), RawCell::Empty],
                vec![RawCell::Empty, RawCell::Empty, "b".into()],
                vec![RawCell::Empty],
            ],
        );
        let grid = sheet.used_range();
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.get(1, 1), &RawCell::Text("a".to_string()));
        assert_eq!(grid.get(2, 2), &RawCell::Text("b".to_string()));
    }

    #[test]
    fn test_used_range_of_blank_sheet() {
        let sheet = MemorySheet::new("s", vec![vec![RawCell::Empty]]);
        assert!(sheet.used_range().is_empty());
    }

    #[test]
    fn test_open_unknown_path() {
        let mut engine = MemoryEngine::new();
        let err = engine.open_workbook(Path::new("nope.xlsx")).unwrap_err();
        assert!(matches!(err, ConvertError::SourceUnavailable(_)));
    }

    #[test]
    fn test_write_and_save_reads_back() {
        let mut engine = MemoryEngine::new();
        let mut output = engine.create_workbook().unwrap();
        engine.rename_sheet(&mut output, 0, "data").unwrap();
        let values = vec![
            vec!["h1".to_string(), "h2".to_string()],
            vec!["x".to_string(), String::new()],
        ];
        engine
            .write_range(&mut output, 0, CellRange::from_origin(2, 2), &values)
            .unwrap();
        engine.save_as(&mut output, Path::new("out.xlsx")).unwrap();

        assert_eq!(engine.writes().len(), 1);
        assert_eq!(engine.writes()[0].sheet_name, "data");

        let saved = engine.workbook("out.xlsx").unwrap();
        assert_eq!(saved.sheet_names(), vec!["data"]);
        let grid = saved.sheets[0].used_range();
        assert_eq!(grid.get(2, 1), &RawCell::Text("x".to_string()));
        assert_eq!(grid.get(2, 2), &RawCell::Empty);
    }
}
