//! Module for the replay pipeline: list and load the fixtures, order them, wrap their records into
//! envelopes and push them to the stream batch by batch.
//!
//! Everything runs sequentially on the caller's thread: one file at a time, one batch at a time.
//! The first error aborts the run. Batches already sent stay sent.

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::{
    batch,
    clock::{Clock, SystemClock},
    envelope::EventEnvelope,
    error::Error,
    progress::ProgressReporter,
    request::{BatchSize, Operation, ReplayRequest, ReplaySummary},
    sink::StreamSink,
    source::{self, SourceDirectory, SourceFile},
};


const TOTAL_LABEL: &str = "TOTAL PROGRESS";
const FILES_UNIT: &str = "Files";
const BATCHES_UNIT: &str = "Batch(es)";

/// Stages a replay run goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Listing,
    Loading,
    Sorting,
    PerFileDispatch,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Listing => "listing",
            Stage::Loading => "loading",
            Stage::Sorting => "sorting",
            Stage::PerFileDispatch => "dispatch",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Runs replays against a set of collaborators: where the fixtures come from, where the batches go,
/// how progress is reported and which clock stamps the envelopes.
pub struct Replayer<D, S, P, C = SystemClock> {
    directory: D,
    sink: S,
    progress: P,
    clock: C,
    stage: Stage,
}

impl<D, S, P> Replayer<D, S, P, SystemClock>
where
    D: SourceDirectory,
    S: StreamSink,
    P: ProgressReporter,
{
    pub fn new(directory: D, sink: S, progress: P) -> Self {
        Self {
            directory,
            sink,
            progress,
            clock: SystemClock,
            stage: Stage::Idle,
        }
    }
}

impl<D, S, P, C> Replayer<D, S, P, C> {
    /// Replaces the clock used for envelope timestamps.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Replayer<D, S, P, C2> {
        Replayer {
            directory: self.directory,
            sink: self.sink,
            progress: self.progress,
            clock,
            stage: self.stage,
        }
    }

    /// Stage reached by the last run.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<D, S, P, C> Replayer<D, S, P, C>
where
    D: SourceDirectory,
    S: StreamSink,
    P: ProgressReporter,
    C: Clock,
{
    /// Replays every file of `request.source_directory` and returns how many records were sent.
    ///
    /// The operation is validated before any I/O. A batch size outside `1..=500` is not an error
    /// here: nothing is sent and the summary reports zero loaded records. Use
    /// [`ReplayRequest::validate`] to reject it upfront.
    pub fn invoke(&mut self, request: ReplayRequest) -> Result<ReplaySummary, Error> {
        self.stage = Stage::Idle;
        let result = self.run(&request);
        self.progress.stop();

        match result {
            Ok(loaded_records) => {
                self.enter(Stage::Done);
                info!(loaded_records, "replay finished");
                Ok(ReplaySummary {
                    request,
                    loaded_records,
                })
            }
            Err(err) => {
                error!(stage = %self.stage, "replay failed: {err}");
                self.stage = Stage::Failed;
                Err(err)
            }
        }
    }

    fn run(&mut self, request: &ReplayRequest) -> Result<u64, Error> {
        let operation = Operation::parse(&request.operation)?;
        let batch_size = match BatchSize::new(request.batch_size) {
            Ok(size) => size.get(),
            Err(err) => {
                warn!("{err}: no batches will be sent");
                0
            }
        };

        let dir = request.source_directory.as_path();

        self.enter(Stage::Listing);
        let entries = self.directory.list_entries(dir)?;
        debug!(dir = %dir.display(), entries = entries.len(), "listed source directory");

        self.enter(Stage::Loading);
        let mut files = source::load_source_files(&self.directory, dir, &entries)?;

        self.enter(Stage::Sorting);
        source::sort_descending(&mut files);
        let order: Vec<String> = files.iter().map(|file| file.name().label()).collect();
        info!("Running on the following order: {}", order.join(","));

        self.enter(Stage::PerFileDispatch);
        let mut total = self
            .progress
            .start(files.len() as u64, TOTAL_LABEL, FILES_UNIT);
        let mut loaded_records = 0;
        for file in files {
            loaded_records += self.dispatch_file(file, &operation, batch_size)?;
            total.advance();
        }

        Ok(loaded_records)
    }

    fn dispatch_file(
        &mut self,
        file: SourceFile,
        operation: &Operation,
        batch_size: usize,
    ) -> Result<u64, Error> {
        let (name, content) = file.into_parts();
        let envelopes: Vec<EventEnvelope> = content
            .into_records()
            .into_iter()
            .map(|record| {
                EventEnvelope::build(
                    record,
                    name.schema(),
                    name.table(),
                    operation,
                    self.clock.now(),
                )
            })
            .collect();

        let batches = batch::chunk(&envelopes, batch_size);
        let mut counter = self
            .progress
            .start(batches.len() as u64, &name.label(), BATCHES_UNIT);

        let mut sent = 0;
        for batch in batches {
            self.sink.send(batch)?;
            sent += batch.len() as u64;
            counter.advance();
        }

        debug!(file = %name, records = sent, "file dispatched");
        Ok(sent)
    }

    fn enter(&mut self, stage: Stage) {
        debug!(from = %self.stage, to = %stage, "stage transition");
        self.stage = stage;
    }
}
