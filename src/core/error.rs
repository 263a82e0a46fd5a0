//! Error types for writers, configuration and dispatch

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization or parse error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Required field of a flat configuration map is missing or empty
    #[error("{0}")]
    MissingField(String),

    /// Required writer attribute is missing
    #[error("Missing attribute '{attribute}' for {component}")]
    MissingAttribute { component: String, attribute: String },

    /// Writer attribute carries a value the writer cannot use
    #[error("Invalid value '{value}' for attribute '{attribute}': {message}")]
    InvalidAttribute {
        attribute: String,
        value: String,
        message: String,
    },

    /// Level name that is not one of the six severities
    #[error("Unknown log level name: '{0}'")]
    UnknownLevelName(String),

    /// Writer kind with no registered constructor
    #[error("Unknown writer kind: '{0}'")]
    UnknownWriterKind(String),

    /// Formatting flag attribute that cannot be parsed
    #[error("Invalid flag value '{value}': {message}")]
    InvalidFlagValue { value: String, message: String },

    /// Console output stream selector outside the fixed set
    #[error("Invalid console output '{0}': expected stdout, stderr or stdin")]
    InvalidStreamSelector(String),

    /// Color name outside the fixed palette
    #[error("Invalid {which} color '{name}'")]
    InvalidColorName { which: String, name: String },

    /// Numeric level identifier out of range
    #[error("Invalid level index {index}: must be below {max}")]
    InvalidLevelIndex { index: usize, max: usize },

    /// File writer error with path
    #[error("File writer error for '{path}': {message}")]
    FileWriterError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// A configuration entry failed; no level was modified
    #[error("Configuration entry '{level}' rejected: {source}")]
    ConfigEntry {
        level: String,
        #[source]
        source: Box<LoggerError>,
    },

    /// Fatal condition raised after broadcasting and flushing
    #[error("Fatal: {0}")]
    Fatal(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn missing_field(message: impl Into<String>) -> Self {
        LoggerError::MissingField(message.into())
    }

    pub fn missing_attribute(component: impl Into<String>, attribute: impl Into<String>) -> Self {
        LoggerError::MissingAttribute {
            component: component.into(),
            attribute: attribute.into(),
        }
    }

    pub fn invalid_attribute(
        attribute: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LoggerError::InvalidAttribute {
            attribute: attribute.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    pub fn invalid_flag(value: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidFlagValue {
            value: value.into(),
            message: message.into(),
        }
    }

    pub fn invalid_color(which: impl Into<String>, name: impl Into<String>) -> Self {
        LoggerError::InvalidColorName {
            which: which.into(),
            name: name.into(),
        }
    }

    /// Create a file writer error
    pub fn file_writer(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileWriterError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Attach the configuration entry name to an error
    pub fn in_entry(level: impl Into<String>, source: LoggerError) -> Self {
        LoggerError::ConfigEntry {
            level: level.into(),
            source: Box::new(source),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Innermost error, skipping configuration entry wrappers
    pub fn root(&self) -> &LoggerError {
        match self {
            LoggerError::ConfigEntry { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::missing_attribute("file writer", "path");
        assert!(matches!(err, LoggerError::MissingAttribute { .. }));

        let err = LoggerError::invalid_flag("abc", "not a number");
        assert!(matches!(err, LoggerError::InvalidFlagValue { .. }));

        let err = LoggerError::file_writer("/var/log/app.log", "Permission denied");
        assert!(matches!(err, LoggerError::FileWriterError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::UnknownWriterKind("smtp".to_string());
        assert_eq!(err.to_string(), "Unknown writer kind: 'smtp'");

        let err = LoggerError::file_rotation("/var/log/app.log", "Disk full");
        assert_eq!(
            err.to_string(),
            "File rotation failed for '/var/log/app.log': Disk full"
        );

        let err = LoggerError::missing_field("log path not found");
        assert_eq!(err.to_string(), "log path not found");

        let err = LoggerError::InvalidLevelIndex { index: 7, max: 6 };
        assert_eq!(err.to_string(), "Invalid level index 7: must be below 6");
    }

    #[test]
    fn test_entry_wrapping_keeps_root() {
        let err = LoggerError::in_entry("info", LoggerError::UnknownWriterKind("smtp".into()));
        assert!(err.to_string().contains("'info'"));
        assert!(err.to_string().contains("smtp"));
        assert!(matches!(err.root(), LoggerError::UnknownWriterKind(_)));
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("writing log file", "cannot write to file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing log file"));
        assert!(err.to_string().contains("cannot write to file"));
    }
}
