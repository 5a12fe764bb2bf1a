//! Module defining the event envelope put on the stream, one per source record.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{request::Operation, source::Record};


const RECORD_TYPE: &str = "data";
const PARTITION_KEY_TYPE: &str = "primary-key";

// Millisecond precision padded to four digits, followed by a literal `Z`. No timezone conversion
// happens.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f0Z";

/// A record wrapped with its change-data-capture metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventEnvelope {
    pub data: Record,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Metadata {
    pub timestamp: String,
    pub record_type: &'static str,
    pub operation: String,
    pub partition_key_type: &'static str,
    pub schema_name: String,
    pub table_name: String,
}

impl EventEnvelope {
    pub fn build(
        record: Record,
        schema: &str,
        table: &str,
        operation: &Operation,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            data: record,
            metadata: Metadata {
                timestamp: format_timestamp(now),
                record_type: RECORD_TYPE,
                operation: operation.as_str().to_string(),
                partition_key_type: PARTITION_KEY_TYPE,
                schema_name: schema.to_string(),
                table_name: table.to_string(),
            },
        }
    }
}

pub(crate) fn format_timestamp(now: NaiveDateTime) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}
