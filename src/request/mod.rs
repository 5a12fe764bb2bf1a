//! Module defining the user-provided replay request and the validation turning its raw fields
//! into domain types. Validation is pure, so callers can reject bad input before touching the
//! filesystem or the stream.

use std::{fmt, path::PathBuf, str::FromStr};

use serde::Serialize;

use crate::error::Error;


/// Each `PutRecords` request accepts at most 500 records.
pub const MAX_BATCH_SIZE: usize = 500;

pub(crate) const VALID_OPERATIONS: [&str; 4] = ["LOAD", "INSERT", "UPDATE", "DELETE"];

/// A validated operation. Keeps the spelling the user supplied, since that is what ends up on the
/// wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation(String);

impl Operation {
    /// Accepts `load`, `insert`, `update` and `delete` in any letter case.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let upper = raw.to_uppercase();
        if VALID_OPERATIONS.contains(&upper.as_str()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(Error::InvalidOperation(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::parse(s)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of records per dispatched batch, between 1 and [`MAX_BATCH_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSize(usize);

impl BatchSize {
    pub fn new(size: i64) -> Result<Self, Error> {
        match usize::try_from(size) {
            Ok(size) if (1..=MAX_BATCH_SIZE).contains(&size) => Ok(Self(size)),
            _ => Err(Error::InvalidBatchSize(size.to_string())),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, Error> {
        let size = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::InvalidBatchSize(raw.to_string()))?;
        Self::new(size)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl FromStr for BatchSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BatchSize::parse(s)
    }
}

impl From<BatchSize> for usize {
    fn from(value: BatchSize) -> Self {
        value.0
    }
}

/// Everything needed for one replay run. Operation and batch size stay in their raw form so they
/// can be echoed back in the [`ReplaySummary`] exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayRequest {
    /// Name of the target stream
    pub stream_name: String,
    /// Partition key attached to every record
    pub partition_key: String,
    /// Directory holding the `order.schema.table.json` files
    pub source_directory: PathBuf,
    /// One of load/insert/update/delete
    pub operation: String,
    /// URL of the stream endpoint
    pub endpoint: String,
    /// Records per batch
    pub batch_size: i64,
}

impl ReplayRequest {
    /// Checks operation and batch size without performing any I/O.
    pub fn validate(&self) -> Result<(Operation, BatchSize), Error> {
        let operation = Operation::parse(&self.operation)?;
        let batch_size = BatchSize::new(self.batch_size)?;
        Ok((operation, batch_size))
    }
}

/// Result of a replay run: the request echoed back together with the number of records the
/// stream accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    #[serde(flatten)]
    pub request: ReplayRequest,
    pub loaded_records: u64,
}
