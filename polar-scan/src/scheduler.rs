use crate::config::FailurePolicy;
use crate::error::ScannerError;
use crate::record::SnapshotSink;
use log::{error, info};
use polar_scan_data::AngularBuffer;
use std::path::PathBuf;

/// Flushes the buffer once every `flush_every` accepted samples.
///
/// The cadence counts samples, not time. The counter only goes back to zero
/// after a successful flush, so with [`FailurePolicy::Tolerant`] a failed
/// flush is retried on the next sample.
pub struct PersistenceScheduler {
    counter: usize,
    flush_every: usize,
    on_failure: FailurePolicy,
}

impl PersistenceScheduler {
    pub fn new(flush_every: usize, on_failure: FailurePolicy) -> PersistenceScheduler {
        PersistenceScheduler {
            counter: 0,
            flush_every,
            on_failure,
        }
    }

    /// Accepted samples since the last successful flush.
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Counts one accepted sample and flushes when due.
    /// Returns the written path when a flush happened.
    pub fn tick<S: SnapshotSink>(
        &mut self,
        buffer: &AngularBuffer,
        sink: &mut S,
    ) -> Result<Option<PathBuf>, ScannerError> {
        self.counter += 1;
        if self.counter < self.flush_every {
            return Ok(None);
        }

        match sink.flush(&buffer.snapshot()) {
            Ok(path) => {
                info!("Saved {} samples to {}", self.counter, path.display());
                self.counter = 0;
                Ok(Some(path))
            }
            Err(e) => match self.on_failure {
                FailurePolicy::FailFast => Err(e),
                FailurePolicy::Tolerant => {
                    error!("Flush failed, retrying on next sample: {}", e);
                    Ok(None)
                }
            },
        }
    }
}
