//! Run configuration resolved from command-line flags and environment.
//!
//! There is no configuration file. `clap` supplies values from flags or the
//! `GRIDTABLE_*` environment variables; this module fills in the defaults.

use crate::error::{require_non_empty, ConvertResult};
use crate::importer::DEFAULT_WORKSHEET;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Environment variable naming the default worksheet
pub const WORKSHEET_ENV: &str = "GRIDTABLE_WORKSHEET";

/// Environment variable naming the directory for generated output files
pub const OUTPUT_DIR_ENV: &str = "GRIDTABLE_OUTPUT_DIR";

/// Everything one `convert` run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub worksheet: String,
    pub table_name: String,
    pub output: PathBuf,
}

impl RunConfig {
    /// Fill defaults: worksheet `page`, table named after the worksheet,
    /// output next to the input (or in `output_dir`) with a time tag.
    pub fn resolve(
        input: PathBuf,
        worksheet: Option<String>,
        output: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        now: NaiveDateTime,
    ) -> ConvertResult<Self> {
        require_non_empty(&input.to_string_lossy(), "Excel file name")?;

        let worksheet = worksheet
            .filter(|w| !w.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WORKSHEET.to_string());
        let table_name = table_name_for_sheet(&worksheet);
        let output = match output {
            Some(path) => path,
            None => tagged_output_path(&input, &time_tag(&now), output_dir.as_deref()),
        };

        Ok(Self {
            input,
            worksheet,
            table_name,
            output,
        })
    }
}

/// Table name for a worksheet: trimmed, spaces replaced by dashes.
pub fn table_name_for_sheet(sheet_name: &str) -> String {
    sheet_name.trim().replace(' ', "-")
}

/// `yyyy-MM-dd-HHmm` stamp used in generated file names
pub fn time_tag(now: &NaiveDateTime) -> String {
    now.format("%Y-%m-%d-%H%M").to_string()
}

/// `<dir>/<input stem>_<tag>.xlsx`, where `dir` defaults to the input's directory.
pub fn tagged_output_path(input: &Path, tag: &str, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());
    let file_name = format!("{}_{}.xlsx", stem, tag);

    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(12, 5, 0)
            .unwrap()
    }

    #[test]
    fn test_time_tag() {
        assert_eq!(time_tag(&noon()), "2025-03-07-1205");
    }

    #[test]
    fn test_table_name_for_sheet() {
        assert_eq!(table_name_for_sheet(" Monthly Sales "), "Monthly-Sales");
        assert_eq!(table_name_for_sheet("page"), "page");
    }

    #[test]
    fn test_tagged_output_path() {
        let path = tagged_output_path(Path::new("/data/report.xlsx"), "TAG", None);
        assert_eq!(path, PathBuf::from("/data/report_TAG.xlsx"));

        let path = tagged_output_path(
            Path::new("/data/report.xlsx"),
            "TAG",
            Some(Path::new("/tmp/out")),
        );
        assert_eq!(path, PathBuf::from("/tmp/out/report_TAG.xlsx"));
    }

    #[test]
    fn test_resolve_defaults() {
        let config =
            RunConfig::resolve(PathBuf::from("in/book.xlsx"), None, None, None, noon()).unwrap();
        assert_eq!(config.worksheet, "page");
        assert_eq!(config.table_name, "page");
        assert_eq!(config.output, PathBuf::from("in/book_2025-03-07-1205.xlsx"));
    }

    #[test]
    fn test_resolve_explicit_values() {
        let config = RunConfig::resolve(
            PathBuf::from("book.xlsx"),
            Some("Q1 Data".to_string()),
            Some(PathBuf::from("out.xlsx")),
            None,
            noon(),
        )
        .unwrap();
        assert_eq!(config.worksheet, "Q1 Data");
        assert_eq!(config.table_name, "Q1-Data");
        assert_eq!(config.output, PathBuf::from("out.xlsx"));
    }

    #[test]
    fn test_resolve_rejects_empty_input() {
        assert!(RunConfig::resolve(PathBuf::new(), None, None, None, noon()).is_err());
    }
}
