//! Module defining where batches of envelopes are sent.

use std::io::Write;

use crate::{envelope::EventEnvelope, error::{Error, sink_error}};

mod kinesis;


pub use kinesis::{DEFAULT_REGION, KinesisSink};

/// Destination of the replayed batches. A call either accepts the whole batch or fails.
pub trait StreamSink {
    fn send(&mut self, batch: &[EventEnvelope]) -> Result<(), Error>;
}

impl<S: StreamSink + ?Sized> StreamSink for &mut S {
    fn send(&mut self, batch: &[EventEnvelope]) -> Result<(), Error> {
        (**self).send(batch)
    }
}

impl<S: StreamSink + ?Sized> StreamSink for Box<S> {
    fn send(&mut self, batch: &[EventEnvelope]) -> Result<(), Error> {
        (**self).send(batch)
    }
}

/// Dry-run sink writing every envelope as one JSON line.
#[derive(Debug)]
pub struct StdoutSink<W> {
    writer: W,
}

impl<W: Write> StdoutSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> StreamSink for StdoutSink<W> {
    fn send(&mut self, batch: &[EventEnvelope]) -> Result<(), Error> {
        for envelope in batch {
            serde_json::to_writer(&mut self.writer, envelope)
                .map_err(|e| sink_error(format!("failed to serialize envelope: {e}")))?;
            self.writer
                .write_all(b"\n")
                .map_err(|e| sink_error(format!("failed to write envelope: {e}")))?;
        }
        self.writer
            .flush()
            .map_err(|e| sink_error(format!("failed to flush output: {e}")))
    }
}
