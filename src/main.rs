use std::path::PathBuf;

use anyhow::Result;
use cdc_replay_rs::{
    BatchSize, DEFAULT_REGION, FsDirectory, KinesisSink, LogFormat, Operation, ReplayRequest,
    ReplaySummary, StdoutSink, StreamSink, TracingProgress, replay, setup_logging,
};
use clap::Parser;

/// Replays `order.schema.table.json` fixtures as change-data-capture records into a Kinesis
/// stream.
#[derive(Debug, Parser)]
#[command(name = "cdc-replay-rs", author, version, about, long_about = None)]
struct Args {
    /// Directory where the JSON files are located
    #[arg(short, long, env = "REPLAY_DIRECTORY")]
    directory: PathBuf,

    /// Name of the target stream
    #[arg(short, long, env = "REPLAY_STREAM_NAME")]
    stream_name: String,

    /// Partition key attached to every record
    #[arg(short, long, env = "REPLAY_PARTITION_KEY", default_value = "1")]
    partition_key: String,

    /// Stream endpoint
    #[arg(short, long, env = "REPLAY_ENDPOINT", default_value = "http://localhost:4566")]
    endpoint: String,

    /// Operation to simulate: load, insert, update or delete
    #[arg(short, long, default_value = "load", value_parser = Operation::parse)]
    operation: Operation,

    /// Records per PutRecords call (1-500)
    #[arg(short, long, default_value = "500", value_parser = BatchSize::parse)]
    batch_size: BatchSize,

    /// Region the requests are addressed to
    #[arg(long, env = "REPLAY_REGION", default_value = DEFAULT_REGION)]
    region: String,

    /// Print the envelopes to stdout instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

impl Args {
    fn to_request(&self) -> ReplayRequest {
        ReplayRequest {
            stream_name: self.stream_name.clone(),
            partition_key: self.partition_key.clone(),
            source_directory: self.directory.clone(),
            operation: self.operation.to_string(),
            endpoint: self.endpoint.clone(),
            batch_size: self.batch_size.get() as i64,
        }
    }

    fn sink(&self) -> Box<dyn StreamSink> {
        if self.dry_run {
            Box::new(StdoutSink::new(std::io::stdout()))
        } else {
            Box::new(
                KinesisSink::new(&self.endpoint, &self.stream_name, &self.partition_key)
                    .with_region(&self.region),
            )
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_format)?;

    let summary = replay(args.to_request(), FsDirectory, args.sink(), TracingProgress)
        .inspect_err(|e| tracing::error!("Error running cli: {e}"))?;

    print_summary(&summary, args.dry_run)?;
    Ok(())
}

/// In dry-run mode stdout carries the envelope lines, so the summary goes to stderr.
fn print_summary(summary: &ReplaySummary, dry_run: bool) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    if dry_run {
        eprintln!("{json}");
    } else {
        println!("{json}");
    }
    Ok(())
}
