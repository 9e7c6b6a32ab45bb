use crate::constants::FRAME_DELIMITER;
use crate::error::FrameError;
use polar_scan_data::Sample;

/// Decodes one `"<angle>,<distance>"` line into a sample.
///
/// Trailing whitespace (including the line terminator) is ignored. The angle
/// may be negative or larger than a full turn and is folded into `[0, 360)`.
pub fn parse_frame(line: &str) -> Result<Sample, FrameError> {
    let fields = line.trim_end().split(FRAME_DELIMITER).collect::<Vec<_>>();
    if fields.len() != 2 {
        return Err(FrameError::FieldCount(fields.len()));
    }
    if fields[0].is_empty() {
        return Err(FrameError::EmptyAngle);
    }

    let angle: i64 = fields[0]
        .trim()
        .parse()
        .map_err(|_| FrameError::InvalidAngle(fields[0].to_string()))?;
    let distance: u32 = fields[1]
        .trim()
        .parse()
        .map_err(|_| FrameError::InvalidDistance(fields[1].to_string()))?;

    Ok(Sample::new(angle, distance))
}
