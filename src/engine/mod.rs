//! Spreadsheet engine adapters.
//!
//! The converter never talks to a spreadsheet library directly. It reads
//! through [`GridSource`], writes through [`GridSink`], and holds the engine
//! in a [`Session`] that launches it lazily and quits it on every exit path.
//!
//! Engines have no concurrency support and no timeouts: a hung engine call
//! blocks the session. Callers that need parallel conversions must use one
//! session per thread.

mod excel;
mod memory;

pub use excel::{ExcelEngine, SourceWorkbook, XlsxOutput};
pub use memory::{MemoryEngine, MemoryOutput, MemorySheet, MemoryWorkbook, WriteCall};

use crate::error::ConvertResult;
use crate::grid::{CellRange, Grid};
use std::path::Path;
use tracing::debug;

/// Read side of an engine
pub trait GridSource {
    type Workbook;

    /// Fails with `SourceUnavailable` if the file is missing, unreadable or corrupt.
    fn open_workbook(&mut self, path: &Path) -> ConvertResult<Self::Workbook>;

    /// Sheet names in workbook order
    fn list_sheets(&self, workbook: &Self::Workbook) -> Vec<String>;

    /// Minimal bounding box of non-empty cells of the sheet at `sheet_index` (0-based).
    fn read_used_range(
        &mut self,
        workbook: &mut Self::Workbook,
        sheet_index: usize,
    ) -> ConvertResult<Grid>;

    fn close_workbook(&mut self, workbook: Self::Workbook);
}

/// Write side of an engine
pub trait GridSink {
    type Output;

    /// New workbook holding one default sheet at index 0.
    fn create_workbook(&mut self) -> ConvertResult<Self::Output>;

    fn sheet_count(&self, workbook: &Self::Output) -> usize;

    /// Insert a sheet after `after` and return its index.
    fn add_sheet(&mut self, workbook: &mut Self::Output, after: usize) -> ConvertResult<usize>;

    fn rename_sheet(
        &mut self,
        workbook: &mut Self::Output,
        sheet_index: usize,
        name: &str,
    ) -> ConvertResult<()>;

    /// Write `values` (row-major, `range.rows()` x `range.cols()`) in one bulk operation.
    fn write_range(
        &mut self,
        workbook: &mut Self::Output,
        sheet_index: usize,
        range: CellRange,
        values: &[Vec<String>],
    ) -> ConvertResult<()>;

    fn save_as(&mut self, workbook: &mut Self::Output, path: &Path) -> ConvertResult<()>;

    fn close_output(&mut self, workbook: Self::Output, discard_changes: bool);
}

/// A process-level engine that can be launched and quit
pub trait Engine: GridSource + GridSink + Sized {
    fn launch() -> ConvertResult<Self>;

    fn quit(&mut self);
}

/// Owns one engine for the length of a conversion run.
///
/// The engine is launched on first use and quit exactly once, by
/// [`Session::close`] or on drop, whichever comes first.
pub struct Session<E: Engine> {
    engine: Option<E>,
}

impl<E: Engine> Session<E> {
    /// Session whose engine is launched on first use
    pub fn new() -> Self {
        Self { engine: None }
    }

    /// Session around an already running engine
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    pub fn is_active(&self) -> bool {
        self.engine.is_some()
    }

    /// The engine, launching it if needed
    pub fn engine_mut(&mut self) -> ConvertResult<&mut E> {
        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => {
                debug!("launching spreadsheet engine");
                E::launch()?
            }
        };
        Ok(self.engine.insert(engine))
    }

    /// The engine if it has been launched
    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Quit the engine now.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            debug!("quitting spreadsheet engine");
            engine.quit();
        }
    }
}

impl<E: Engine> Default for Session<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Engine> Drop for Session<E> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_launches_lazily() {
        let mut session: Session<MemoryEngine> = Session::new();
        assert!(!session.is_active());
        session.engine_mut().unwrap();
        assert!(session.is_active());
    }

    #[test]
    fn test_session_quits_on_drop() {
        let engine = MemoryEngine::new();
        let quits = engine.quit_counter();
        {
            let _session = Session::with_engine(engine);
        }
        assert_eq!(quits.get(), 1);
    }

    #[test]
    fn test_session_close_quits_once() {
        let engine = MemoryEngine::new();
        let quits = engine.quit_counter();
        let session = Session::with_engine(engine);
        session.close();
        assert_eq!(quits.get(), 1);
    }

    #[test]
    fn test_unlaunched_session_never_quits() {
        let session: Session<MemoryEngine> = Session::new();
        drop(session);
    }
}
