//! Sink speaking the Kinesis `PutRecords` JSON protocol over plain HTTP, meant for local emulators
//! such as Localstack.
//!
//! Requests are not signed. The `Authorization` header only carries a credential scope so that the
//! emulator routes the call to the configured region.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    envelope::EventEnvelope,
    error::{Error, sink_error},
    sink::StreamSink,
};

pub const DEFAULT_REGION: &str = "sa-east-1";

const TARGET: &str = "Kinesis_20131202.PutRecords";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct KinesisSink {
    agent: ureq::Agent,
    endpoint: String,
    stream_name: String,
    partition_key: String,
    region: String,
}

impl KinesisSink {
    pub fn new(
        endpoint: impl Into<String>,
        stream_name: impl Into<String>,
        partition_key: impl Into<String>,
    ) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(TIMEOUT)
                .timeout_connect(CONNECT_TIMEOUT)
                .build(),
            endpoint: endpoint.into(),
            stream_name: stream_name.into(),
            partition_key: partition_key.into(),
            region: DEFAULT_REGION.to_string(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    fn authorization(&self) -> String {
        let date = Utc::now().format("%Y%m%d");
        format!(
            "AWS4-HMAC-SHA256 Credential=local/{date}/{region}/kinesis/aws4_request, \
             SignedHeaders=content-type;host;x-amz-target, Signature=unsigned",
            region = self.region
        )
    }
}

impl StreamSink for KinesisSink {
    fn send(&mut self, batch: &[EventEnvelope]) -> Result<(), Error> {
        let body = PutRecordsRequest::new(&self.stream_name, &self.partition_key, batch)?;

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", CONTENT_TYPE)
            .set("X-Amz-Target", TARGET)
            .set("Authorization", &self.authorization())
            .send_json(&body)
            .map_err(|e| match e {
                ureq::Error::Status(code, response) => {
                    let text = response.into_string().unwrap_or_default();
                    sink_error(format!("PutRecords returned status {code}: {text}"))
                }
                other => sink_error(format!("PutRecords request failed: {other}")),
            })?;

        let result: PutRecordsResponse = response
            .into_json()
            .map_err(|e| sink_error(format!("invalid PutRecords response: {e}")))?;
        result.ensure_all_accepted()?;

        debug!(
            stream = %self.stream_name,
            records = batch.len(),
            "PutRecords accepted batch"
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PutRecordsRequest<'a> {
    pub(crate) stream_name: &'a str,
    pub(crate) records: Vec<PutRecordsEntry<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PutRecordsEntry<'a> {
    /// Base64 of the JSON-encoded envelope
    pub(crate) data: String,
    pub(crate) partition_key: &'a str,
}

impl<'a> PutRecordsRequest<'a> {
    pub(crate) fn new(
        stream_name: &'a str,
        partition_key: &'a str,
        batch: &[EventEnvelope],
    ) -> Result<Self, Error> {
        let records = batch
            .iter()
            .map(|envelope| {
                let json = serde_json::to_vec(envelope)
                    .map_err(|e| sink_error(format!("failed to serialize envelope: {e}")))?;
                Ok(PutRecordsEntry {
                    data: STANDARD.encode(json),
                    partition_key,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Self {
            stream_name,
            records,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PutRecordsResponse {
    #[serde(default)]
    pub(crate) failed_record_count: u64,
    #[serde(default)]
    pub(crate) records: Vec<PutRecordsResultEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PutRecordsResultEntry {
    pub(crate) error_code: Option<String>,
    pub(crate) error_message: Option<String>,
}

impl PutRecordsResponse {
    /// Kinesis answers 200 even when single records were rejected.
    pub(crate) fn ensure_all_accepted(&self) -> Result<(), Error> {
        if self.failed_record_count == 0 {
            return Ok(());
        }
        let first = self
            .records
            .iter()
            .find(|entry| entry.error_code.is_some());
        let detail = match first {
            Some(entry) => format!(
                ": {} {}",
                entry.error_code.as_deref().unwrap_or_default(),
                entry.error_message.as_deref().unwrap_or_default()
            ),
            None => String::new(),
        };
        Err(sink_error(format!(
            "{} of {} records rejected by the stream{detail}",
            self.failed_record_count,
            self.records.len()
        )))
    }
}
