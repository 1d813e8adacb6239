use std::fmt;
use std::fmt::Formatter;
use thiserror::Error;

/// Error depicting errors that occur while loading configuration
///
#[derive(Debug)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigError: {}", self.0)
    }
}
impl std::error::Error for ConfigError {}
impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError(e.to_string())
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError(e.to_string())
    }
}
impl From<&str> for ConfigError {
    fn from(e: &str) -> Self {
        ConfigError(e.to_string())
    }
}

/// Error depicting errors that occur while setting up logging
///
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("LoggingError::Appender: {0}")]
    Appender(#[from] std::io::Error),
    #[error("LoggingError::Config: {0}")]
    Config(#[from] log4rs::config::runtime::ConfigErrors),
    #[error("LoggingError::Init: {0}")]
    Init(#[from] log::SetLoggerError),
}

/// Error depicting errors that occur while reading and writing pipeline artifacts
///
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("StorageError::File: {0}")]
    File(#[from] std::io::Error),
    #[error("StorageError::Document: {0}")]
    Document(#[from] serde_json::Error),
    #[error("StorageError::Pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Error depicting errors that occur while normalizing a raw forecast
///
#[derive(Error, Debug)]
#[error("AnalyzeError: {0}")]
pub struct AnalyzeError(pub String);
impl From<serde_json::Error> for AnalyzeError {
    fn from(e: serde_json::Error) -> Self {
        AnalyzeError(format!("raw forecast document error: {}", e))
    }
}
impl From<StorageError> for AnalyzeError {
    fn from(e: StorageError) -> Self {
        AnalyzeError(e.to_string())
    }
}

/// Error depicting errors that occur while summarizing one city
///
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("AggregateError::NoDaytimeData: no day matches the daytime window")]
    NoDaytimeData,
    #[error("AggregateError::UnknownCity: {0}")]
    UnknownCity(String),
    #[error("AggregateError::Storage: {0}")]
    Storage(#[from] StorageError),
}

/// Error depicting errors that occur while writing or reading the report
///
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("ReportError::File: {0}")]
    File(#[from] std::io::Error),
    #[error("ReportError::Csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("ReportError::Malformed: {0}")]
    Malformed(String),
}

/// Error depicting errors that occur while building a worker pool
///
#[derive(Error, Debug)]
#[error("PoolError: {0}")]
pub struct PoolError(#[from] pub rayon::ThreadPoolBuildError);
