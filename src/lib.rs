mod batch;
mod clock;
mod envelope;
mod error;
mod progress;
mod replay;
mod request;
mod sink;
mod source;
mod telemetry;

pub use batch::{Batches, batch_count, chunk};
pub use clock::{Clock, FixedClock, SystemClock};
pub use envelope::{EventEnvelope, Metadata};
pub use error::Error;
pub use progress::{ProgressHandle, ProgressReporter, TracingProgress};
pub use replay::{Replayer, Stage};
pub use request::{
    BatchSize, MAX_BATCH_SIZE, Operation, ReplayRequest, ReplaySummary,
};
pub use sink::{DEFAULT_REGION, KinesisSink, StdoutSink, StreamSink};
pub use source::{Content, FileName, FsDirectory, Record, SourceDirectory, SourceFile};
pub use telemetry::{LogFormat, setup_logging};

/// Replays a directory of `order.schema.table.json` fixtures into a stream.
///
/// Files are processed from the highest to the lowest order. Each record becomes one
/// [`EventEnvelope`], and the envelopes of a file are sent in batches of `request.batch_size`
/// through `sink`. The first invalid file name, unreadable file or rejected batch aborts the run.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use cdc_replay_rs::{FsDirectory, KinesisSink, ReplayRequest, TracingProgress, replay};
///
/// let request = ReplayRequest {
///     stream_name: "cdc-stream".to_string(),
///     partition_key: "1".to_string(),
///     source_directory: PathBuf::from("fixtures"),
///     operation: "load".to_string(),
///     endpoint: "http://localhost:4566".to_string(),
///     batch_size: 100,
/// };
/// let sink = KinesisSink::new(&request.endpoint, &request.stream_name, &request.partition_key);
/// let summary = replay(request, FsDirectory, sink, TracingProgress).unwrap();
/// println!("{} records loaded", summary.loaded_records);
/// ```
pub fn replay(
    request: ReplayRequest,
    directory: impl SourceDirectory,
    sink: impl StreamSink,
    progress: impl ProgressReporter,
) -> Result<ReplaySummary, Error> {
    Replayer::new(directory, sink, progress).invoke(request)
}
