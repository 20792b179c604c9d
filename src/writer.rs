use crate::error::ConvertResult;
use crate::parser::TableSetFormat;
use crate::types::TableSet;
use std::fs;
use std::path::Path;

/// Write a table set as YAML, or JSON for `.json` paths
pub fn write_table_set(path: &Path, tables: &TableSet) -> ConvertResult<()> {
    let content = match TableSetFormat::from_path(path) {
        TableSetFormat::Yaml => serde_yaml::to_string(tables)?,
        TableSetFormat::Json => serde_json::to_string_pretty(tables)?,
    };
    fs::write(path, content)?;
    Ok(())
}
