//! Progress reporting for replay runs.

use tracing::info;

/// A single counter started by a [`ProgressReporter`].
pub trait ProgressHandle {
    fn advance(&mut self);
}

/// Creates progress counters and flushes them once the run is over.
pub trait ProgressReporter {
    /// Starts a counter going from 0 to `total`. `label` names what is tracked, `unit` what is
    /// counted.
    fn start(&mut self, total: u64, label: &str, unit: &str) -> Box<dyn ProgressHandle>;

    fn stop(&mut self);
}

/// Reports progress as `tracing` events.
#[derive(Debug, Default)]
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn start(&mut self, total: u64, label: &str, unit: &str) -> Box<dyn ProgressHandle> {
        info!(label, total, unit, "started");
        Box::new(TracingCounter {
            label: label.to_string(),
            unit: unit.to_string(),
            value: 0,
            total,
        })
    }

    fn stop(&mut self) {
        info!("progress reporting stopped");
    }
}

struct TracingCounter {
    label: String,
    unit: String,
    value: u64,
    total: u64,
}

impl ProgressHandle for TracingCounter {
    fn advance(&mut self) {
        self.value += 1;
        info!(
            label = %self.label,
            "{}/{} {}",
            self.value,
            self.total,
            self.unit
        );
    }
}
