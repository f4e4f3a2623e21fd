//! Export error types

use thiserror::Error;

use crate::decode::DecodeError;
use crate::merge::MergeError;
use crate::wav::EncodeError;

/// Errors that can end an export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("Failed to encode WAV: {0}")]
    Encode(#[from] EncodeError),

    #[error("Failed to deliver {file_name}: {source}")]
    Delivery {
        file_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Export cancelled")]
    Cancelled,
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;
