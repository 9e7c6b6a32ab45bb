//! Record files: one CSV per flush, 360 rows of `(angle_radian, distance)`.
//!
//! With [`FileNaming::WallClock`] two flushes within the same second map to
//! the same file name and the later one replaces the earlier. Use
//! [`FileNaming::Sequence`] when flushes can happen more than once a second.

use crate::constants::{RECORD_EXTENSION, RECORD_PREFIX};
use crate::error::ScannerError;
use crate::numeric::{degree_to_radian, to_decimal, to_physical_distance};
use chrono::Local;
use log::warn;
use polar_scan_data::Snapshot;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileNaming {
    /// `test_<HH>_<MM>_<SS>.csv` from the local time at flush start.
    WallClock,
    /// `test_<NNNNNN>.csv` counting successful flushes from 1.
    Sequence,
}

/// Destination of buffer snapshots.
pub trait SnapshotSink {
    /// Persists `snapshot` and returns where it went.
    fn flush(&mut self, snapshot: &Snapshot) -> Result<PathBuf, ScannerError>;
}

pub struct RecordWriter {
    save_dir: PathBuf,
    naming: FileNaming,
    sequence: u64,
}

impl RecordWriter {
    pub fn new<P: Into<PathBuf>>(save_dir: P, naming: FileNaming) -> RecordWriter {
        RecordWriter {
            save_dir: save_dir.into(),
            naming,
            sequence: 0,
        }
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    fn file_name(&self) -> String {
        match self.naming {
            FileNaming::WallClock => format!(
                "{}{}.{}",
                RECORD_PREFIX,
                Local::now().format("%H_%M_%S"),
                RECORD_EXTENSION
            ),
            FileNaming::Sequence => format!(
                "{}{:06}.{}",
                RECORD_PREFIX,
                self.sequence + 1,
                RECORD_EXTENSION
            ),
        }
    }

    /// Writes the whole snapshot or nothing.
    ///
    /// Rows go to a `.part` file first which is renamed into place once
    /// complete, so a failure never leaves a truncated record behind.
    pub fn write(&mut self, snapshot: &Snapshot) -> Result<PathBuf, ScannerError> {
        let path = self.save_dir.join(self.file_name());
        let part = path.with_extension(format!("{}.part", RECORD_EXTENSION));

        let written = write_rows(&part, snapshot).and_then(|_| fs::rename(&part, &path));
        if let Err(source) = written {
            if part.exists() {
                if let Err(e) = fs::remove_file(&part) {
                    warn!("Failed to remove {}: {}", part.display(), e);
                }
            }
            return Err(ScannerError::Persistence { path, source });
        }

        self.sequence += 1;
        Ok(path)
    }
}

impl SnapshotSink for RecordWriter {
    fn flush(&mut self, snapshot: &Snapshot) -> Result<PathBuf, ScannerError> {
        self.write(snapshot)
    }
}

fn write_rows(path: &Path, snapshot: &Snapshot) -> io::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    for (angle, distance) in snapshot.iter() {
        writer.write_record([
            to_decimal(degree_to_radian(angle as f64)),
            to_decimal(to_physical_distance(distance)),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a record file back as `(angle_radian, distance)` rows.
pub fn read_record(path: &Path) -> Result<Vec<(f64, f64)>, ScannerError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() != 2 {
            return Err(invalid_row(&record));
        }
        let angle: f64 = record[0].parse().map_err(|_| invalid_row(&record))?;
        let distance: f64 = record[1].parse().map_err(|_| invalid_row(&record))?;
        rows.push((angle, distance));
    }
    Ok(rows)
}

fn invalid_row(record: &csv::StringRecord) -> ScannerError {
    ScannerError::Io(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("Invalid record row {:?}", record),
    ))
}

/// Creates `dir` if needed and deletes every regular file and symlink in it.
/// Subdirectories are left alone. Returns the number of removed entries.
pub fn prepare_save_dir(dir: &Path) -> Result<usize, ScannerError> {
    fs::create_dir_all(dir)?;
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_file() || file_type.is_symlink() {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}
