use crate::sample::Sample;
use crate::LIDAR_RESOLUTION;

/// Latest distance per integer degree, one slot per angle.
///
/// The buffer is created once per run and mutated in place. Slots that never
/// received a sample hold `0`, which cannot be told apart from a genuine zero
/// reading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AngularBuffer {
    distances: [u32; LIDAR_RESOLUTION],
}

impl AngularBuffer {
    pub fn new() -> AngularBuffer {
        AngularBuffer {
            distances: [0; LIDAR_RESOLUTION],
        }
    }

    /// Overwrites the slot for `sample.angle`. The previous reading is lost.
    pub fn update(&mut self, sample: Sample) {
        let index = sample.angle as usize % LIDAR_RESOLUTION;
        self.distances[index] = sample.distance;
    }

    /// Copies the current state out so readers never see a later update.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            distances: self.distances,
        }
    }

    pub fn get(&self, angle: u16) -> u32 {
        self.distances[angle as usize % LIDAR_RESOLUTION]
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for AngularBuffer {
    fn default() -> Self {
        AngularBuffer::new()
    }
}

/// Point-in-time copy of an [`AngularBuffer`], indexed by degree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    distances: [u32; LIDAR_RESOLUTION],
}

impl Snapshot {
    pub fn distances(&self) -> &[u32; LIDAR_RESOLUTION] {
        &self.distances
    }

    /// Iterates `(angle_degree, raw_distance)` in ascending angle order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u32)> + '_ {
        self.distances
            .iter()
            .enumerate()
            .map(|(angle, distance)| (angle as u16, *distance))
    }
}

impl From<[u32; LIDAR_RESOLUTION]> for Snapshot {
    fn from(distances: [u32; LIDAR_RESOLUTION]) -> Self {
        Snapshot { distances }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::Snapshot;
    use crate::LIDAR_RESOLUTION;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    // serde has no derive for 360-element arrays, go through a sequence.
    impl Serialize for Snapshot {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.distances.iter())
        }
    }

    impl<'de> Deserialize<'de> for Snapshot {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let values = Vec::<u32>::deserialize(deserializer)?;
            let len = values.len();
            let distances: [u32; LIDAR_RESOLUTION] = values.try_into().map_err(|_| {
                D::Error::invalid_length(len, &"exactly 360 distances")
            })?;
            Ok(Snapshot { distances })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_zeroed() {
        let buffer = AngularBuffer::new();
        assert_eq!(buffer.len(), LIDAR_RESOLUTION);
        assert!(buffer.snapshot().distances().iter().all(|d| *d == 0));
    }

    #[test]
    fn test_update_overwrites() {
        let mut buffer = AngularBuffer::new();
        buffer.update(Sample::new(42, 100));
        buffer.update(Sample::new(42, 300));
        assert_eq!(buffer.get(42), 300);
        assert_eq!(buffer.len(), LIDAR_RESOLUTION);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut buffer = AngularBuffer::new();
        buffer.update(Sample::new(1, 10));
        let snapshot = buffer.snapshot();
        buffer.update(Sample::new(1, 20));
        assert_eq!(snapshot.distances()[1], 10);
        assert_eq!(buffer.get(1), 20);
    }

    #[test]
    fn test_snapshot_idempotent() {
        let mut buffer = AngularBuffer::new();
        buffer.update(Sample::new(359, 8192));
        assert_eq!(buffer.snapshot(), buffer.snapshot());
    }

    #[test]
    fn test_iter_in_angle_order() {
        let mut buffer = AngularBuffer::new();
        buffer.update(Sample::new(-1, 5));
        let rows: Vec<_> = buffer.snapshot().iter().collect();
        assert_eq!(rows.len(), LIDAR_RESOLUTION);
        assert_eq!(rows[0], (0, 0));
        assert_eq!(rows[359], (359, 5));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_snapshot() {
        let mut buffer = AngularBuffer::new();
        buffer.update(Sample::new(3, 33));
        let json = serde_json::to_string(&buffer.snapshot()).unwrap();
        let decoded: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, buffer.snapshot());

        assert!(serde_json::from_str::<Snapshot>("[1, 2, 3]").is_err());
    }
}
