use crate::constants::{
    BUFFER_SIZE, DEFAULT_BAUD_RATE, DEFAULT_CANVAS_SIZE, DEFAULT_PORT, DEFAULT_SAVE_DIR,
    DEFAULT_TIMEOUT_MS,
};
use crate::error::ScannerError;
use crate::record::FileNaming;
use std::path::PathBuf;
use std::time::Duration;

/// What to do when a frame fails to parse or a flush fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run and surface the error.
    FailFast,
    /// Log and keep going.
    Tolerant,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SerialConfig {
    /// Serial port name such as `/dev/ttyUSB0` or `COM6`.
    pub port_name: String,
    pub baud_rate: u32,
    /// Read timeout. A read that times out is treated as "no data yet".
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            port_name: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScannerConfig {
    pub serial: SerialConfig,
    /// Directory receiving record files. Cleared at startup.
    pub save_dir: PathBuf,
    /// Width and height of the square canvas in pixels.
    pub canvas_size: u32,
    /// Accepted samples between two flushes.
    pub flush_every: usize,
    pub file_naming: FileNaming,
    pub parse_policy: FailurePolicy,
    pub flush_policy: FailurePolicy,
    /// Read and parse frames on a dedicated thread.
    pub threaded_reader: bool,
    /// How long the threaded source waits for a sample before reporting idle.
    pub poll_interval: Duration,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            serial: SerialConfig::default(),
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            canvas_size: DEFAULT_CANVAS_SIZE,
            flush_every: BUFFER_SIZE,
            file_naming: FileNaming::WallClock,
            parse_policy: FailurePolicy::Tolerant,
            flush_policy: FailurePolicy::FailFast,
            threaded_reader: false,
            poll_interval: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ScannerConfig {
    pub fn validate(&self) -> Result<(), ScannerError> {
        if self.canvas_size == 0 {
            return Err(ScannerError::InvalidConfig(
                "canvas size must be positive".to_string(),
            ));
        }
        if self.flush_every == 0 {
            return Err(ScannerError::InvalidConfig(
                "flush interval must be at least one sample".to_string(),
            ));
        }
        if self.serial.baud_rate == 0 {
            return Err(ScannerError::InvalidConfig(
                "baud rate must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
