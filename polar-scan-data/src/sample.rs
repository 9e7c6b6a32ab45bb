#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One validated reading from the sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Angle in integer degrees, always in `[0, 360)`.
    pub angle: u16,
    /// Distance in sensor-native raw units.
    pub distance: u32,
}

impl Sample {
    /// Builds a sample, folding any integer angle into `[0, 360)`.
    pub fn new(angle: i64, distance: u32) -> Sample {
        Sample {
            angle: normalize_angle(angle),
            distance,
        }
    }
}

/// Folds negative or out-of-range degrees into `[0, 360)`.
pub fn normalize_angle(angle: i64) -> u16 {
    angle.rem_euclid(crate::LIDAR_RESOLUTION as i64) as u16
}
