use crate::numeric::degree_to_radian;
use polar_scan_data::DISTANCE_SCALE;

/// Maps `value` linearly from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// `in_min == in_max` is a configuration error and yields a non-finite value.
pub fn scale_distance(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
}

pub fn to_cartesian(radius: f64, angle_radian: f64) -> (f64, f64) {
    (radius * f64::cos(angle_radian), radius * f64::sin(angle_radian))
}

/// Screen geometry for a square canvas: raw distances `[0, 8192]` map onto
/// radii `[0, canvas_size / 2]` around the canvas center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projector {
    offset: f64,
}

impl Projector {
    pub fn new(canvas_size: u32) -> Projector {
        Projector {
            offset: (canvas_size / 2) as f64,
        }
    }

    pub fn center(&self) -> [f64; 2] {
        [self.offset, self.offset]
    }

    pub fn radius(&self, raw_distance: u32) -> f64 {
        scale_distance(raw_distance as f64, 0., DISTANCE_SCALE, 0., self.offset)
    }

    /// Screen point for a raw distance seen at `angle_degree`.
    pub fn project(&self, angle_degree: u16, raw_distance: u32) -> [f64; 2] {
        let (x, y) = to_cartesian(
            self.radius(raw_distance),
            degree_to_radian(angle_degree as f64),
        );
        [x + self.offset, y + self.offset]
    }
}
