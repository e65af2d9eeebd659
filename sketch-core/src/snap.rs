//! Grid snapping for element coordinates.

/// Default snap grid unit.
pub const GRID_SIZE: f64 = 8.0;

/// Round `value` to the nearest multiple of [`GRID_SIZE`] when `enabled`.
#[must_use]
pub fn snap(value: f64, enabled: bool) -> f64 {
    snap_to(value, GRID_SIZE, enabled)
}

/// Round `value` to the nearest multiple of `grid` when `enabled`.
///
/// Halfway values round away from zero. A non-positive grid disables snapping.
#[must_use]
pub fn snap_to(value: f64, grid: f64, enabled: bool) -> f64 {
    if !enabled || grid <= 0.0 || !value.is_finite() {
        return value;
    }
    (value / grid).round() * grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_rounds_to_grid() {
        assert!((snap(100.0, true) - 104.0).abs() < f64::EPSILON);
        assert!((snap(99.0, true) - 96.0).abs() < f64::EPSILON);
        assert!((snap(3.9, true)).abs() < f64::EPSILON);
        assert!((snap(4.0, true) - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_disabled_is_identity() {
        assert!((snap(13.37, false) - 13.37).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_negative() {
        assert!((snap(-20.0, true) - -24.0).abs() < f64::EPSILON);
        assert!((snap(-3.0, true)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_to_custom_grid() {
        assert!((snap_to(22.0, 10.0, true) - 20.0).abs() < f64::EPSILON);
        assert!((snap_to(22.0, 0.0, true) - 22.0).abs() < f64::EPSILON);
    }
}
