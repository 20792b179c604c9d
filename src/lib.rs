//! GridTable - spreadsheet grids to string-typed tables and back
//!
//! This library reads a worksheet's used range into an in-memory table whose
//! cells are all text, and writes a set of tables back out as a workbook with
//! one sheet per table.
//!
//! # Features
//!
//! - Header row becomes column names (scan stops at the first blank header)
//! - Every cell coerced to text: numbers in general format, dates invariant
//! - Case-insensitive, whitespace-tolerant worksheet lookup
//! - One bulk range write per exported sheet
//! - Decimal columns forced to two places with banker's rounding on export
//! - Workbook engine released exactly once per session
//!
//! # Example
//!
//! ```no_run
//! use royalbit_gridtable::engine::{ExcelEngine, Session};
//! use royalbit_gridtable::{export_table_set_to_file, import_sheet_to_table, TableSet};
//! use std::path::Path;
//!
//! let mut session: Session<ExcelEngine> = Session::new();
//! let mut tables = TableSet::new();
//!
//! let table = import_sheet_to_table(
//!     &mut session,
//!     &mut tables,
//!     Path::new("report.xlsx"),
//!     "page",
//!     "page",
//! )?;
//! println!("Rows: {}", table.row_count());
//!
//! export_table_set_to_file(&mut session, &tables, Path::new("copy.xlsx"))?;
//! session.close();
//! # Ok::<(), royalbit_gridtable::error::ConvertError>(())
//! ```

pub mod cli;
pub mod coerce;
pub mod config;
pub mod engine;
pub mod error;
pub mod exporter;
pub mod format;
pub mod grid;
pub mod importer;
pub mod parser;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use coerce::{coerce_decimal_for_export, coerce_to_text};
pub use engine::Session;
pub use error::{ConvertError, ConvertResult};
pub use exporter::export_table_set_to_file;
pub use grid::{Grid, RawCell};
pub use importer::import_sheet_to_table;
pub use types::{Column, ColumnKind, Row, Table, TableSet};
