use polar_scan_data::DISTANCE_SCALE;

pub(crate) fn degree_to_radian(degree: f64) -> f64 {
    degree * std::f64::consts::PI / 180.
}

/// Raw sensor units to physical distance.
pub(crate) fn to_physical_distance(raw: u32) -> f64 {
    raw as f64 / DISTANCE_SCALE
}

/// Shortest round-trip text for `value`, always with a decimal point.
pub(crate) fn to_decimal(value: f64) -> String {
    format!("{:?}", value)
}
