use std::sync::Arc;
use thiserror::Error;

/// rxr 的錯誤通道型別
pub type StreamError = Arc<dyn std::error::Error + Send + Sync>;

/// 課程中串流送出的錯誤
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RxError {
    #[error("{0}")]
    Message(String),

    #[error("Failed to fetch user {user_id}: {reason}")]
    FetchFailed { user_id: u32, reason: String },

    #[error("Observable was dropped before it completed")]
    Dropped,
}

impl RxError {
    pub fn message(text: impl Into<String>) -> Self {
        RxError::Message(text.into())
    }

    /// 包成 rxr 的錯誤通道型別
    pub fn into_stream(self) -> StreamError {
        Arc::new(self)
    }

    /// 從 rxr 錯誤通道取回；不是 `RxError` 的錯誤保留其訊息
    pub fn from_stream(err: &StreamError) -> Self {
        err.downcast_ref::<RxError>()
            .cloned()
            .unwrap_or_else(|| RxError::Message(err.to_string()))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown lesson '{name}'. Available lessons: {available}")]
    UnknownLesson { name: String, available: String },

    #[error("Lesson '{lesson}' did not finish within {timeout_ms}ms")]
    LessonTimeout { lesson: String, timeout_ms: u64 },

    #[error("Lesson '{lesson}' failed: {source}")]
    LessonFailed {
        lesson: String,
        #[source]
        source: RxError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Stream,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::ConfigError { .. }
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::UnknownLesson { .. } => ErrorCategory::Configuration,
            AppError::LessonTimeout { .. } | AppError::LessonFailed { .. } => {
                ErrorCategory::Stream
            }
            AppError::IoError(_) | AppError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 課程逾時通常只是延遲設定過大，重跑即可
            AppError::LessonTimeout { .. } => ErrorSeverity::Medium,
            AppError::LessonFailed { .. } => ErrorSeverity::High,
            AppError::ConfigError { .. }
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::UnknownLesson { .. } => ErrorSeverity::High,
            AppError::IoError(_) | AppError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AppError::UnknownLesson { available, .. } => {
                format!("Pick one of: {}. Use --list to see every lesson", available)
            }
            AppError::LessonTimeout { .. } => {
                "Raise --lesson-timeout-ms or lower --max-fetch-delay-ms".to_string()
            }
            AppError::LessonFailed {
                source: RxError::FetchFailed { .. },
                ..
            } => "Lower --fetch-failure-rate (0 disables simulated failures)".to_string(),
            AppError::LessonFailed { .. } => {
                "Re-run with --verbose to see the notifications leading up to the error".to_string()
            }
            AppError::InvalidConfigValueError { field, .. }
            | AppError::ConfigValidationError { field, .. } => {
                format!("Check the value of '{}' in the TOML file or on the command line", field)
            }
            AppError::ConfigError { .. } => "Check the configuration file syntax".to_string(),
            AppError::IoError(_) => "Check that the path exists and is writable".to_string(),
            AppError::SerializationError(_) => "Report this as a bug".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Stream => format!("A lesson did not run to completion: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
