mod config;
mod constants;
mod error;
mod frame;
mod numeric;
mod projector;
mod reader_thread;
mod record;
mod render;
mod scanner;
mod scheduler;
mod serial;
#[cfg(feature = "window")]
mod window;

use crate::constants::READER_CHANNEL_CAPACITY;
use log::info;

pub use crate::config::{FailurePolicy, ScannerConfig, SerialConfig};
pub use crate::error::{FrameError, ScannerError};
pub use crate::frame::parse_frame;
pub use crate::projector::{scale_distance, to_cartesian, Projector};
pub use crate::reader_thread::{spawn_reader, ChannelSource, ReaderThread};
pub use crate::record::{prepare_save_dir, read_record, FileNaming, RecordWriter, SnapshotSink};
pub use crate::render::{
    DisplaySurface, DrawCommand, Frame, NullSurface, RenderLoop, RenderOutcome, RenderState,
};
pub use crate::scanner::{Scanner, Step};
pub use crate::scheduler::PersistenceScheduler;
pub use crate::serial::{open_port, LineReader, LineSource, SampleSource, SourceEvent};
#[cfg(feature = "window")]
pub use crate::window::PistonSurface;
pub use polar_scan_data::{AngularBuffer, Sample, Snapshot};

/// Function to run the scanner until the surface quits.
/// # Arguments
///
/// * `config` - Port, persistence and rendering settings.
/// * `surface` - Where each redraw is presented.
///
/// The save directory is cleared before the port is opened. The port and the
/// surface are released when this function returns.
pub fn run_scanner<S: DisplaySurface>(
    config: &ScannerConfig,
    surface: S,
) -> Result<(), ScannerError> {
    config.validate()?;

    let removed = prepare_save_dir(&config.save_dir)?;
    info!(
        "Cleared {} entries from {}",
        removed,
        config.save_dir.display()
    );

    let port = open_port(&config.serial)?;
    info!(
        "Listening on {} at {} baud",
        config.serial.port_name, config.serial.baud_rate
    );

    let scheduler = PersistenceScheduler::new(config.flush_every, config.flush_policy);
    let writer = RecordWriter::new(&config.save_dir, config.file_naming);
    let render = RenderLoop::new(Projector::new(config.canvas_size));

    if config.threaded_reader {
        let source = spawn_reader(
            port,
            config.parse_policy,
            READER_CHANNEL_CAPACITY,
            config.poll_interval,
        );
        Scanner::new(source, scheduler, writer, render, surface).run()
    } else {
        let source = LineSource::new(port, config.parse_policy);
        Scanner::new(source, scheduler, writer, render, surface).run()
    }
}
