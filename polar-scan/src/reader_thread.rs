use crate::config::FailurePolicy;
use crate::error::ScannerError;
use crate::serial::{decode_line, LineReader, SampleSource, SourceEvent};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, error};
use polar_scan_data::Sample;
use std::io::Read;
use std::thread::JoinHandle;
use std::time::Duration;

/// Struct that owns the reader thread.
///
/// Dropping it asks the thread to stop and joins it.
pub struct ReaderThread {
    terminator_tx: Sender<bool>,
    thread: Option<JoinHandle<()>>,
}

/// Samples produced by a [`ReaderThread`], in arrival order.
pub struct ChannelSource {
    // Declared before `_reader` so the receiver is gone before the join, which
    // unblocks a reader stuck on a full channel.
    sample_rx: Receiver<Result<Sample, ScannerError>>,
    poll_interval: Duration,
    _reader: ReaderThread,
}

/// Moves `reader` to a dedicated thread that parses frames and forwards
/// samples through a bounded channel of `capacity` entries.
pub fn spawn_reader<R>(
    reader: R,
    policy: FailurePolicy,
    capacity: usize,
    poll_interval: Duration,
) -> ChannelSource
where
    R: Read + Send + 'static,
{
    let (terminator_tx, terminator_rx) = bounded(1);
    let (sample_tx, sample_rx) = bounded(capacity);

    let thread = Some(std::thread::spawn(move || {
        read_samples(LineReader::new(reader), policy, sample_tx, terminator_rx);
    }));

    ChannelSource {
        sample_rx,
        poll_interval,
        _reader: ReaderThread {
            terminator_tx,
            thread,
        },
    }
}

fn read_samples<R: Read>(
    mut lines: LineReader<R>,
    policy: FailurePolicy,
    sample_tx: Sender<Result<Sample, ScannerError>>,
    terminator_rx: Receiver<bool>,
) {
    while !do_terminate(&terminator_rx) {
        let event = lines
            .next_line()
            .and_then(|maybe_line| match maybe_line {
                Some(line) => decode_line(&line, policy),
                None => Ok(SourceEvent::Idle),
            });
        let message = match event {
            Ok(SourceEvent::Sample(sample)) => Ok(sample),
            Ok(_) => continue,
            Err(e) => Err(e),
        };
        let fatal = message.is_err();
        if sample_tx.send(message).is_err() {
            debug!("Sample receiver dropped, stopping reader");
            return;
        }
        if fatal {
            return;
        }
    }
}

fn do_terminate(terminator_rx: &Receiver<bool>) -> bool {
    terminator_rx.try_recv().unwrap_or(false)
}

impl Drop for ReaderThread {
    fn drop(&mut self) {
        // The thread may already be gone after a fatal error.
        let _ = self.terminator_tx.try_send(true);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Reader thread panicked");
            }
        }
    }
}

impl SampleSource for ChannelSource {
    fn next_sample(&mut self) -> Result<SourceEvent, ScannerError> {
        match self.sample_rx.recv_timeout(self.poll_interval) {
            Ok(Ok(sample)) => Ok(SourceEvent::Sample(sample)),
            Ok(Err(e)) => Err(e),
            Err(RecvTimeoutError::Timeout) => Ok(SourceEvent::Idle),
            Err(RecvTimeoutError::Disconnected) => Err(ScannerError::Disconnected),
        }
    }
}
