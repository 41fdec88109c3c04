use crate::api::ApiError;
use log::LevelFilter;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Log level for a failed API call.
    pub fn classify_api_error(&self, error: &ApiError) -> LogLevel {
        match error {
            // Caller mistakes: unknown model, bad level
            ApiError::Http { status, .. } if *status == 404 || *status == 422 => LogLevel::Warn,

            // Server-side analysis failures are what the operator needs to see
            ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Error,

            // The server answered but not with the shape we render
            ApiError::Decode(_) => LogLevel::Error,

            // Server down or unreachable, usually the service is stopped
            ApiError::Reqwest(_) => LogLevel::Warn,

            _ => LogLevel::Warn,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}
