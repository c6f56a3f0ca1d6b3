use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("{message}")]
    NodeNotFound { message: String },

    #[error("{message}")]
    NoResult { message: String },

    #[error("{message}")]
    DataNotReady { message: String },

    #[error("{message}")]
    ReadOrder { message: String },

    #[error("{message}")]
    AlreadyRead { message: String },

    #[error("{message}")]
    DataCorruption { message: String },

    #[error("{message}")]
    Miscellaneous { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Data,
    Routing,
    Usage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RouteError {
    pub fn node_not_found(message: impl Into<String>) -> Self {
        Self::NodeNotFound {
            message: message.into(),
        }
    }

    pub fn no_result(message: impl Into<String>) -> Self {
        Self::NoResult {
            message: message.into(),
        }
    }

    pub fn data_not_ready(message: impl Into<String>) -> Self {
        Self::DataNotReady {
            message: message.into(),
        }
    }

    pub fn read_order(message: impl Into<String>) -> Self {
        Self::ReadOrder {
            message: message.into(),
        }
    }

    pub fn already_read(message: impl Into<String>) -> Self {
        Self::AlreadyRead {
            message: message.into(),
        }
    }

    pub fn data_corruption(message: impl Into<String>) -> Self {
        Self::DataCorruption {
            message: message.into(),
        }
    }

    pub fn miscellaneous(message: impl Into<String>) -> Self {
        Self::Miscellaneous {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) => ErrorCategory::Io,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::DataNotReady { .. }
            | Self::DataCorruption { .. } => ErrorCategory::Data,
            Self::NodeNotFound { .. } | Self::NoResult { .. } => ErrorCategory::Routing,
            Self::ReadOrder { .. } | Self::AlreadyRead { .. } | Self::Miscellaneous { .. } => {
                ErrorCategory::Usage
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 找不到航路屬於正常查詢結果
            Self::NodeNotFound { .. } | Self::NoResult { .. } => ErrorSeverity::Medium,
            Self::IoError(_) | Self::DataCorruption { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::IoError(_) => "Check that the path exists and is readable",
            Self::CsvError(_) | Self::DataCorruption { .. } => {
                "Re-download the navdata and run compile-navdata again"
            }
            Self::SerializationError(_) => "Delete the compiled files and recompile the navdata",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file or command line flags",
            Self::NodeNotFound { .. } => "Check the spelling of the airport or fix name",
            Self::NoResult { .. } => "Try other airports or drop the SID/STAR restriction",
            Self::DataNotReady { .. } | Self::ReadOrder { .. } | Self::AlreadyRead { .. } => {
                "Read navaids, edges and airports exactly once, in that order"
            }
            Self::Miscellaneous { .. } => "Check the route request",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Unable to access file: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Navdata problem: {}", self),
            ErrorCategory::Routing => format!("No route: {}", self),
            ErrorCategory::Usage => format!("Invalid request: {}", self),
        }
    }

    /// 對應 CLI 結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_display_bare_message() {
        let err = RouteError::no_result("Airport not found.");
        assert_eq!(err.to_string(), "Airport not found.");
        assert_eq!(err.category(), ErrorCategory::Routing);
    }

    #[test]
    fn test_exit_codes_follow_severity() {
        assert_eq!(RouteError::no_result("x").exit_code(), 2);
        assert_eq!(RouteError::read_order("x").exit_code(), 1);
        assert_eq!(RouteError::data_corruption("x").exit_code(), 3);
        let io = RouteError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_friendly_message_mentions_cause() {
        let err = RouteError::node_not_found("Cannot find airport ZZZZ.");
        assert!(err.user_friendly_message().contains("ZZZZ"));
    }
}
