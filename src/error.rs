//! Module defining the errors which are exposed to the users of the crate

use std::path::PathBuf;

use crate::request::{MAX_BATCH_SIZE, VALID_OPERATIONS};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File name not following the `order.schema.table.json` convention
    #[error(
        "Invalid file name {filename}. \
         Files should follow the pattern order.schema.table.json: {reason}"
    )]
    InvalidFilename { filename: String, reason: String },

    /// Operation outside of load/insert/update/delete
    #[error(
        "Invalid operation {0}. Please Make sure to select one of the following: [{ops}]",
        ops = VALID_OPERATIONS.join(", ")
    )]
    InvalidOperation(String),

    /// Batch size outside of the range accepted by the stream
    #[error(
        "Invalid batch size {0}. Please Make sure to select a number between 1 and {max}",
        max = MAX_BATCH_SIZE
    )]
    InvalidBatchSize(String),

    /// The source directory or one of its files could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file is not valid JSON
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON which is neither a record object nor an array of record objects
    #[error("{} must contain a JSON object or an array of JSON objects", .path.display())]
    InvalidContent { path: PathBuf },

    /// The stream refused or failed to accept a batch
    #[error("failed to dispatch batch: {message}")]
    SinkDispatch { message: String },
}

pub(crate) fn invalid_filename(filename: impl Into<String>, reason: impl Into<String>) -> Error {
    Error::InvalidFilename {
        filename: filename.into(),
        reason: reason.into(),
    }
}

pub(crate) fn sink_error(message: impl Into<String>) -> Error {
    Error::SinkDispatch {
        message: message.into(),
    }
}
