use std::path::PathBuf;

use thiserror::Error;

/// Error types for the site optimizer
#[derive(Error, Debug)]
pub enum OptimizerError {
    /// An input or output file could not be opened, read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row in an input source could not be parsed
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The number of locations k is invalid (must be > 0)
    #[error("Invalid k value: {0}")]
    InvalidK(String),

    /// A tuning parameter is outside its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The result record could not be encoded
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// The logger could not be installed
    #[error("Logger initialisation failed: {0}")]
    Logger(String),
}

impl OptimizerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }
}
