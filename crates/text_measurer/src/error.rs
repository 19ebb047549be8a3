//! Error types for text measurement

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("Invalid widths data: {0}")]
    DataFormat(String),

    #[error("could not load default metrics from {}", dir.display())]
    ResourceMissing { dir: PathBuf },

    #[error("Failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Read error: {0}")]
    Read(#[source] std::io::Error),
}

impl From<serde_json::Error> for MeasureError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            // Stream failures such as bad gzip data are not format errors
            MeasureError::Read(std::io::Error::from(err))
        } else {
            MeasureError::DataFormat(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, MeasureError>;
