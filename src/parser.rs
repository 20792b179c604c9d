use crate::error::{ConvertError, ConvertResult};
use crate::types::TableSet;
use std::path::Path;

/// On-disk encodings of a table set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSetFormat {
    Yaml,
    Json,
}

impl TableSetFormat {
    /// `.json` files are JSON, everything else YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TableSetFormat::Json,
            _ => TableSetFormat::Yaml,
        }
    }
}

/// Parse a table set file written by `writer::write_table_set`.
///
/// Every table is checked for rows whose width differs from its column count.
pub fn parse_table_set(path: &Path) -> ConvertResult<TableSet> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ConvertError::SourceUnavailable(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let tables = parse_table_set_str(&content, TableSetFormat::from_path(path))?;

    for table in tables.iter() {
        table
            .validate_lengths()
            .map_err(ConvertError::InvalidArgument)?;
    }
    Ok(tables)
}

pub fn parse_table_set_str(content: &str, format: TableSetFormat) -> ConvertResult<TableSet> {
    let tables = match format {
        TableSetFormat::Yaml => serde_yaml::from_str(content)?,
        TableSetFormat::Json => serde_json::from_str(content)?,
    };
    Ok(tables)
}
