pub mod buffer;
pub mod sample;

pub use buffer::{AngularBuffer, Snapshot};
pub use sample::{normalize_angle, Sample};

/// Number of angular slots, one per integer degree.
pub const LIDAR_RESOLUTION: usize = 360;
/// Raw distance units per physical unit.
pub const DISTANCE_SCALE: f64 = 8192.;
