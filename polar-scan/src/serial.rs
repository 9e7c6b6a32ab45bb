use crate::config::{FailurePolicy, SerialConfig};
use crate::constants::{MAX_FRAME_LEN, READ_CHUNK_SIZE};
use crate::error::ScannerError;
use crate::frame::parse_frame;
use log::{debug, warn};
use polar_scan_data::Sample;
use serialport::SerialPort;
use std::io::{ErrorKind, Read};

pub fn open_port(config: &SerialConfig) -> Result<Box<dyn SerialPort>, ScannerError> {
    let port = serialport::new(&config.port_name, config.baud_rate)
        .timeout(config.timeout)
        .open()?;
    Ok(port)
}

/// Splits a byte stream into newline-terminated lines.
///
/// Bytes received before a read timeout are kept and completed by later
/// reads, so a frame split across two reads is still decoded whole.
pub struct LineReader<R> {
    reader: R,
    pending: Vec<u8>,
}

impl<R: Read> LineReader<R> {
    pub fn new(reader: R) -> LineReader<R> {
        LineReader {
            reader,
            pending: Vec::with_capacity(MAX_FRAME_LEN),
        }
    }

    /// Returns the next line without its terminator, or `None` when the
    /// transport timed out before a full line arrived.
    pub fn next_line(&mut self) -> Result<Option<String>, ScannerError> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            if let Some(line) = self.take_line() {
                return Ok(Some(line));
            }
            match self.reader.read(&mut chunk) {
                Ok(0) => return Err(ScannerError::Disconnected),
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    return Ok(None)
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ScannerError::Io(e)),
            }
        }
    }

    fn take_line(&mut self) -> Option<String> {
        let end = match self.pending.iter().position(|b| *b == b'\n') {
            Some(index) => index + 1,
            // garbage without a terminator is handed out so it gets rejected
            None if self.pending.len() > MAX_FRAME_LEN => self.pending.len(),
            None => return None,
        };
        let bytes = self.pending.drain(..end).collect::<Vec<_>>();
        let line = String::from_utf8_lossy(&bytes);
        Some(line.trim_end_matches(['\r', '\n']).to_string())
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Outcome of asking a source for the next sample.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceEvent {
    Sample(Sample),
    /// A line arrived but was dropped.
    Rejected,
    /// Nothing arrived within the read timeout.
    Idle,
}

pub trait SampleSource {
    fn next_sample(&mut self) -> Result<SourceEvent, ScannerError>;
}

/// Applies the parse policy to one received line.
pub(crate) fn decode_line(line: &str, policy: FailurePolicy) -> Result<SourceEvent, ScannerError> {
    match parse_frame(line) {
        Ok(sample) => Ok(SourceEvent::Sample(sample)),
        Err(e) if e.is_malformed() => {
            debug!("Dropped malformed frame {:?}: {}", line, e);
            Ok(SourceEvent::Rejected)
        }
        Err(e) => match policy {
            FailurePolicy::FailFast => Err(ScannerError::UnparsableFrame {
                line: line.to_string(),
                source: e,
            }),
            FailurePolicy::Tolerant => {
                warn!("Dropped unparsable frame {:?}: {}", line, e);
                Ok(SourceEvent::Rejected)
            }
        },
    }
}

/// Reads and parses frames inline on the caller's thread.
pub struct LineSource<R> {
    lines: LineReader<R>,
    policy: FailurePolicy,
}

impl<R: Read> LineSource<R> {
    pub fn new(reader: R, policy: FailurePolicy) -> LineSource<R> {
        LineSource {
            lines: LineReader::new(reader),
            policy,
        }
    }
}

impl<R: Read> SampleSource for LineSource<R> {
    fn next_sample(&mut self) -> Result<SourceEvent, ScannerError> {
        match self.lines.next_line()? {
            Some(line) => decode_line(&line, self.policy),
            None => Ok(SourceEvent::Idle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Yields the scripted chunks, timing out between them.
    struct ChunkedReader {
        chunks: Vec<Option<&'static [u8]>>,
    }

    impl Read for ChunkedReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.chunks.is_empty() {
                return Ok(0);
            }
            match self.chunks.remove(0) {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(chunk);
                    Ok(chunk.len())
                }
                None => Err(std::io::Error::new(ErrorKind::TimedOut, "timed out")),
            }
        }
    }

    #[test]
    fn test_next_line() {
        let mut lines = LineReader::new(Cursor::new(b"0,8192\r\n90,4096\n".to_vec()));
        assert_eq!(lines.next_line().unwrap(), Some("0,8192".to_string()));
        assert_eq!(lines.next_line().unwrap(), Some("90,4096".to_string()));
        assert!(matches!(lines.next_line(), Err(ScannerError::Disconnected)));
    }

    #[test]
    fn test_next_line_keeps_partial_frame() {
        let reader = ChunkedReader {
            chunks: vec![Some(&b"12,40"[..]), None, Some(&b"96\n"[..])],
        };
        let mut lines = LineReader::new(reader);
        assert_eq!(lines.next_line().unwrap(), None);
        assert_eq!(lines.next_line().unwrap(), Some("12,4096".to_string()));
    }

    #[test]
    fn test_next_line_bounds_garbage() {
        let garbage = vec![b'x'; MAX_FRAME_LEN + 10];
        let mut lines = LineReader::new(Cursor::new(garbage));
        let line = lines.next_line().unwrap().unwrap();
        assert_eq!(line.len(), MAX_FRAME_LEN + 10);
        assert!(lines.next_line().is_err());
    }

    #[test]
    fn test_next_line_lossy() {
        let mut lines = LineReader::new(Cursor::new(b"\xff\xfe,1\n".to_vec()));
        let line = lines.next_line().unwrap().unwrap();
        assert!(parse_frame(&line).is_err());
    }

    #[test]
    fn test_decode_line() {
        assert_eq!(
            decode_line("-10,100", FailurePolicy::FailFast).unwrap(),
            SourceEvent::Sample(Sample {
                angle: 350,
                distance: 100
            })
        );
        assert_eq!(
            decode_line("1,2,3", FailurePolicy::FailFast).unwrap(),
            SourceEvent::Rejected
        );
        assert_eq!(
            decode_line("x,2", FailurePolicy::Tolerant).unwrap(),
            SourceEvent::Rejected
        );
        assert!(matches!(
            decode_line("x,2", FailurePolicy::FailFast),
            Err(ScannerError::UnparsableFrame { .. })
        ));
    }

    #[test]
    fn test_line_source() {
        let reader = ChunkedReader {
            chunks: vec![Some(&b"5,6\n,1\n"[..]), None],
        };
        let mut source = LineSource::new(reader, FailurePolicy::Tolerant);
        assert_eq!(
            source.next_sample().unwrap(),
            SourceEvent::Sample(Sample {
                angle: 5,
                distance: 6
            })
        );
        assert_eq!(source.next_sample().unwrap(), SourceEvent::Rejected);
        assert_eq!(source.next_sample().unwrap(), SourceEvent::Idle);
        assert!(matches!(
            source.next_sample(),
            Err(ScannerError::Disconnected)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_line_source_over_pty() {
        use serialport::TTYPort;
        use std::io::Write;

        let (mut master, slave) = TTYPort::pair().expect("Unable to create ptty pair");
        let slave_ptr = Box::new(slave) as Box<dyn SerialPort>;
        let mut source = LineSource::new(slave_ptr, FailurePolicy::Tolerant);

        master.write_all(b"181,0\n").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(10));

        assert_eq!(
            source.next_sample().unwrap(),
            SourceEvent::Sample(Sample {
                angle: 181,
                distance: 0
            })
        );
        assert_eq!(source.next_sample().unwrap(), SourceEvent::Idle);
    }
}
