use thiserror::Error;

pub type ConvertResult<T> = Result<T, ConvertError>;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// A required input (file path, sheet name, table name) was empty.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The source workbook could not be opened or read.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// A matched sheet, table or table set produced no records.
    #[error("No records: {0}")]
    EmptyResult(String),

    /// The destination workbook could not be created, written or saved.
    #[error("Sink failure: {0}")]
    SinkFailure(String),

    /// A table name cannot be used as a sheet name.
    #[error("Invalid sheet name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::InvalidArgument(_) => "InvalidArgument",
            ConvertError::SourceUnavailable(_) => "SourceUnavailable",
            ConvertError::EmptyResult(_) => "EmptyResult",
            ConvertError::SinkFailure(_) => "SinkFailure",
            ConvertError::InvalidName(_) => "InvalidName",
            ConvertError::Io(_) => "Io",
            ConvertError::Yaml(_) => "Yaml",
            ConvertError::Json(_) => "Json",
        }
    }
}

/// Fail with `InvalidArgument` when a required string input is empty.
pub fn require_non_empty(value: &str, what: &str) -> ConvertResult<()> {
    if value.trim().is_empty() {
        return Err(ConvertError::InvalidArgument(format!(
            "{} must not be empty",
            what
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("page", "sheet name").is_ok());

        let err = require_non_empty("   ", "sheet name").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidArgument(_)));
        assert_eq!(
            err.to_string(),
            "Invalid argument: sheet name must not be empty"
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(
            ConvertError::EmptyResult("x".to_string()).kind(),
            "EmptyResult"
        );
        assert_eq!(
            ConvertError::SinkFailure("x".to_string()).kind(),
            "SinkFailure"
        );
        let io = ConvertError::from(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(io.kind(), "Io");
    }
}
