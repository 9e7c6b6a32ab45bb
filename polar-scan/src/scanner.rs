use crate::error::ScannerError;
use crate::record::SnapshotSink;
use crate::render::{DisplaySurface, RenderLoop, RenderOutcome};
use crate::scheduler::PersistenceScheduler;
use crate::serial::{SampleSource, SourceEvent};
use polar_scan_data::{AngularBuffer, Sample};
use std::path::PathBuf;

/// Result of one receive cycle.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Nothing arrived within the read timeout.
    Idle,
    /// A line arrived and was dropped.
    Rejected,
    Accepted {
        sample: Sample,
        flushed: Option<PathBuf>,
    },
    /// The display surface asked to quit.
    Quit,
}

/// Drives receive, parse, update, render and flush, strictly in that order
/// for every sample.
pub struct Scanner<Src, Sink, Surf> {
    source: Src,
    buffer: AngularBuffer,
    scheduler: PersistenceScheduler,
    sink: Sink,
    render: RenderLoop,
    surface: Surf,
}

impl<Src, Sink, Surf> Scanner<Src, Sink, Surf>
where
    Src: SampleSource,
    Sink: SnapshotSink,
    Surf: DisplaySurface,
{
    pub fn new(
        source: Src,
        scheduler: PersistenceScheduler,
        sink: Sink,
        render: RenderLoop,
        surface: Surf,
    ) -> Scanner<Src, Sink, Surf> {
        Scanner {
            source,
            buffer: AngularBuffer::new(),
            scheduler,
            sink,
            render,
            surface,
        }
    }

    pub fn buffer(&self) -> &AngularBuffer {
        &self.buffer
    }

    pub fn scheduler(&self) -> &PersistenceScheduler {
        &self.scheduler
    }

    pub fn surface(&self) -> &Surf {
        &self.surface
    }

    pub fn step(&mut self) -> Result<Step, ScannerError> {
        let sample = match self.source.next_sample()? {
            SourceEvent::Sample(sample) => sample,
            SourceEvent::Rejected => return Ok(Step::Rejected),
            SourceEvent::Idle => {
                // keep the surface responsive while the sensor is silent
                if self.surface.poll_quit() {
                    return Ok(Step::Quit);
                }
                return Ok(Step::Idle);
            }
        };

        self.buffer.update(sample);
        if self.render.draw(&self.buffer.snapshot(), &mut self.surface)? == RenderOutcome::Quit {
            return Ok(Step::Quit);
        }
        let flushed = self.scheduler.tick(&self.buffer, &mut self.sink)?;

        Ok(Step::Accepted { sample, flushed })
    }

    /// Runs until the surface quits or a fatal error occurs.
    pub fn run(&mut self) -> Result<(), ScannerError> {
        loop {
            if self.step()? == Step::Quit {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FailurePolicy;
    use crate::projector::Projector;
    use crate::record::{read_record, FileNaming, RecordWriter};
    use crate::render::MemorySurface;
    use crate::serial::LineSource;
    use polar_scan_data::LIDAR_RESOLUTION;
    use std::io::Cursor;

    fn scanner(
        input: &str,
        flush_every: usize,
        writer: RecordWriter,
        surface: MemorySurface,
    ) -> Scanner<LineSource<Cursor<Vec<u8>>>, RecordWriter, MemorySurface> {
        Scanner::new(
            LineSource::new(
                Cursor::new(input.as_bytes().to_vec()),
                FailurePolicy::Tolerant,
            ),
            PersistenceScheduler::new(flush_every, FailurePolicy::FailFast),
            writer,
            RenderLoop::new(Projector::new(800)),
            surface,
        )
    }

    #[test]
    fn test_end_to_end_frames() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RecordWriter::new(dir.path(), FileNaming::Sequence);
        let mut scanner = scanner(
            "0,8192\n90,4096\n181,0\n-10,100\n",
            1000,
            writer,
            MemorySurface::default(),
        );

        for _ in 0..4 {
            assert!(matches!(scanner.step().unwrap(), Step::Accepted { .. }));
        }
        assert!(matches!(scanner.step(), Err(ScannerError::Disconnected)));

        let snapshot = scanner.buffer().snapshot();
        for (angle, distance) in snapshot.iter() {
            let expected = match angle {
                0 => 8192,
                90 => 4096,
                350 => 100,
                _ => 0,
            };
            assert_eq!(distance, expected, "angle {}", angle);
        }
        assert_eq!(scanner.surface().frames.len(), 4);
        assert_eq!(scanner.scheduler().counter(), 4);
    }

    #[test]
    fn test_rejected_frames_leave_buffer_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RecordWriter::new(dir.path(), FileNaming::Sequence);
        let mut scanner = scanner(
            "1,2,3\n,5\n\nabc,1\n7\n",
            1,
            writer,
            MemorySurface::default(),
        );

        for _ in 0..5 {
            assert_eq!(scanner.step().unwrap(), Step::Rejected);
        }
        assert_eq!(scanner.buffer(), &AngularBuffer::new());
        assert!(scanner.surface().frames.is_empty());
        assert_eq!(scanner.scheduler().counter(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_flushes_after_accepted_samples_only() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RecordWriter::new(dir.path(), FileNaming::Sequence);
        let mut scanner = scanner("1,10\nbad\n2,20\n3,30\n", 3, writer, MemorySurface::default());

        assert!(matches!(
            scanner.step().unwrap(),
            Step::Accepted { flushed: None, .. }
        ));
        assert_eq!(scanner.step().unwrap(), Step::Rejected);
        assert!(matches!(
            scanner.step().unwrap(),
            Step::Accepted { flushed: None, .. }
        ));
        let path = match scanner.step().unwrap() {
            Step::Accepted {
                flushed: Some(path),
                ..
            } => path,
            other => panic!("expected a flush, got {:?}", other),
        };

        let rows = read_record(&path).unwrap();
        assert_eq!(rows.len(), LIDAR_RESOLUTION);
        assert_eq!(rows[1].1, 10. / 8192.);
        assert_eq!(rows[3].1, 30. / 8192.);
        assert_eq!(scanner.scheduler().counter(), 0);
    }

    #[test]
    fn test_run_stops_on_quit() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RecordWriter::new(dir.path(), FileNaming::Sequence);
        let surface = MemorySurface {
            quit_after: Some(2),
            ..MemorySurface::default()
        };
        let mut scanner = scanner("1,1\n2,2\n3,3\n4,4\n", 1000, writer, surface);

        scanner.run().unwrap();
        assert_eq!(scanner.surface().frames.len(), 2);
        // the third sample reached the buffer before the quit check
        assert_eq!(scanner.buffer().get(3), 3);
        assert_eq!(scanner.buffer().get(4), 0);
    }

    #[test]
    fn test_run_surfaces_fatal_errors() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RecordWriter::new(dir.path().join("missing"), FileNaming::Sequence);
        let mut scanner = scanner("1,1\n2,2\n", 2, writer, MemorySurface::default());

        assert!(matches!(
            scanner.run(),
            Err(ScannerError::Persistence { .. })
        ));
    }

    #[test]
    fn test_strict_frames_end_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut scanner = Scanner::new(
            LineSource::new(Cursor::new(b"1,1\n1,x\n".to_vec()), FailurePolicy::FailFast),
            PersistenceScheduler::new(1000, FailurePolicy::FailFast),
            RecordWriter::new(dir.path(), FileNaming::Sequence),
            RenderLoop::new(Projector::new(800)),
            MemorySurface::default(),
        );

        assert!(matches!(
            scanner.run(),
            Err(ScannerError::UnparsableFrame { .. })
        ));
        assert_eq!(scanner.buffer().get(1), 1);
    }
}
