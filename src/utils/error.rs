use thiserror::Error;

#[derive(Error, Debug)]
pub enum CounterError {
    #[error("Signup store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Signup store query failed (status {status:?}): {message}")]
    StoreQueryFailed { status: Option<u16>, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Store,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CounterError {
    /// 穩定的錯誤代碼，供日誌與監控使用
    pub fn code(&self) -> &'static str {
        match self {
            CounterError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            CounterError::StoreQueryFailed { .. } => "STORE_QUERY_FAILED",
            CounterError::ConfigError { .. } => "CONFIG_ERROR",
            CounterError::MissingConfigError { .. } => "CONFIG_MISSING",
            CounterError::InvalidConfigValueError { .. } => "CONFIG_INVALID_VALUE",
            CounterError::ConfigValidationError { .. } => "CONFIG_VALIDATION",
            CounterError::IoError(_) => "IO_ERROR",
            CounterError::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CounterError::StoreUnavailable { .. } | CounterError::StoreQueryFailed { .. } => {
                ErrorCategory::Store
            }
            CounterError::ConfigError { .. }
            | CounterError::MissingConfigError { .. }
            | CounterError::InvalidConfigValueError { .. }
            | CounterError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            CounterError::IoError(_) | CounterError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 暫時性錯誤，呼叫端可重試
            CounterError::StoreUnavailable { .. } => ErrorSeverity::Medium,
            CounterError::StoreQueryFailed { .. } => ErrorSeverity::High,
            CounterError::SerializationError(_) => ErrorSeverity::High,
            CounterError::ConfigError { .. }
            | CounterError::MissingConfigError { .. }
            | CounterError::InvalidConfigValueError { .. }
            | CounterError::ConfigValidationError { .. }
            | CounterError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn is_config_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CounterError::StoreUnavailable { .. } => {
                "Check network connectivity to the Supabase project and retry".to_string()
            }
            CounterError::StoreQueryFailed { status, .. } => match status {
                Some(401) | Some(403) => {
                    "Check that the Supabase key has read access to the signups table".to_string()
                }
                Some(404) => "Check that the signups table name is correct".to_string(),
                _ => "Inspect the Supabase logs for the failing query".to_string(),
            },
            CounterError::MissingConfigError { field } => {
                format!("Provide a value for '{}' via flag, environment or config file", field)
            }
            CounterError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
            CounterError::ConfigValidationError { field, .. } => {
                format!("Review the '{}' section of the configuration", field)
            }
            CounterError::ConfigError { .. } => {
                "Review the service configuration and environment variables".to_string()
            }
            CounterError::IoError(_) => "Check file paths and permissions".to_string(),
            CounterError::SerializationError(_) => {
                "This is likely a bug, please report it".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Store => "Subscriber counter is temporarily unavailable".to_string(),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("Unexpected system error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CounterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_have_distinct_codes() {
        let unavailable = CounterError::StoreUnavailable {
            message: "connection refused".to_string(),
        };
        let failed = CounterError::StoreQueryFailed {
            status: Some(403),
            message: "permission denied".to_string(),
        };

        assert_eq!(unavailable.code(), "STORE_UNAVAILABLE");
        assert_eq!(failed.code(), "STORE_QUERY_FAILED");
        assert_eq!(unavailable.category(), ErrorCategory::Store);
        assert_eq!(failed.category(), ErrorCategory::Store);
        assert!(unavailable.severity() < failed.severity());
    }

    #[test]
    fn test_user_friendly_message_hides_store_details() {
        let err = CounterError::StoreQueryFailed {
            status: Some(500),
            message: "relation \"email_signups\" does not exist".to_string(),
        };

        let message = err.user_friendly_message();
        assert!(!message.contains("email_signups"));
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = CounterError::MissingConfigError {
            field: "supabase_url".to_string(),
        };

        assert!(err.is_config_error());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.recovery_suggestion().contains("supabase_url"));
    }
}
