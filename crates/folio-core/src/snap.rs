//! Grid snapping for free-positioned container items.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Grid size used by image containers.
pub const GRID_SIZE: f64 = 20.0;

/// Snap mode applied to item positions and sizes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SnapMode {
    /// Values pass through unchanged.
    #[default]
    None,
    /// Values round to the nearest multiple of `size`.
    Grid { size: f64 },
}

impl SnapMode {
    pub fn grid() -> Self {
        SnapMode::Grid { size: GRID_SIZE }
    }

    pub fn is_enabled(self) -> bool {
        matches!(self, SnapMode::Grid { size } if size > 0.0)
    }

    /// Snap a single coordinate or extent.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            SnapMode::Grid { size } if size > 0.0 => snap_value(value, size),
            _ => value,
        }
    }

    pub fn apply_point(self, point: Point) -> Point {
        Point::new(self.apply(point.x), self.apply(point.y))
    }
}

/// Round `value` to the nearest multiple of `grid_size`.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    (value / grid_size).round() * grid_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_value() {
        assert_eq!(snap_value(29.0, 20.0), 20.0);
        assert_eq!(snap_value(31.0, 20.0), 40.0);
        assert_eq!(snap_value(-9.0, 20.0), 0.0);
    }

    #[test]
    fn test_none_passes_through() {
        assert_eq!(SnapMode::None.apply(13.7), 13.7);
        assert!(!SnapMode::None.is_enabled());
    }

    #[test]
    fn test_degenerate_grid_is_ignored() {
        let mode = SnapMode::Grid { size: 0.0 };
        assert!(!mode.is_enabled());
        assert_eq!(mode.apply(13.7), 13.7);
    }

    #[test]
    fn test_grid_mode() {
        let mode = SnapMode::grid();
        assert_eq!(mode.apply_point(Point::new(9.0, 11.0)), Point::new(0.0, 20.0));
    }
}
