//! Error types and handling for the `ER Finder` application

use thiserror::Error;

/// Main error type for the `ER Finder` application
#[derive(Error, Debug)]
pub enum ErFinderError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Language-model or chat API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Facility data loading errors
    #[error("Data error: {message}")]
    Data { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ErFinderError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new data error
    pub fn data<S: Into<String>>(message: S) -> Self {
        Self::Data {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ErFinderError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            ErFinderError::Api { message } => {
                format!("External service call failed: {message}")
            }
            ErFinderError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            ErFinderError::Data { .. } => {
                "Facility data could not be loaded. Please check the CSV file.".to_string()
            }
            ErFinderError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<csv::Error> for ErFinderError {
    fn from(err: csv::Error) -> Self {
        ErFinderError::data(err.to_string())
    }
}
