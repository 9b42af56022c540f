use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the mail summary pipeline.
#[derive(Error, Debug)]
pub enum MailError {
    /// The input log could not be opened or read from disk.
    #[error("Failed to read input {path}: {source}")]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row did not have the expected number of columns.
    #[error("Malformed row at line {line}: expected {expected} columns, found {found}")]
    MalformedRow {
        line: u64,
        found: usize,
        expected: usize,
    },

    /// The `time` column of a row is not an integer millisecond timestamp.
    #[error("Invalid timestamp at line {line}: {value:?}")]
    InvalidTimestamp { line: u64, value: String },

    /// The CSV reader or writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A chart could not be drawn or encoded.
    #[error("Chart rendering error: {0}")]
    Chart(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the mail crates.
pub type Result<T> = std::result::Result<T, MailError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_input_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = MailError::InputNotFound {
            path: PathBuf::from("/some/events.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read input"));
        assert!(msg.contains("/some/events.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_malformed_row() {
        let err = MailError::MalformedRow {
            line: 12,
            found: 4,
            expected: 6,
        };
        assert_eq!(
            err.to_string(),
            "Malformed row at line 12: expected 6 columns, found 4"
        );
    }

    #[test]
    fn test_error_display_invalid_timestamp() {
        let err = MailError::InvalidTimestamp {
            line: 3,
            value: "yesterday".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid timestamp at line 3: \"yesterday\"");
    }

    #[test]
    fn test_error_display_chart() {
        let err = MailError::Chart("backend closed".to_string());
        assert_eq!(err.to_string(), "Chart rendering error: backend closed");
    }

    #[test]
    fn test_error_display_config() {
        let err = MailError::Config("unknown theme".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown theme");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: MailError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
