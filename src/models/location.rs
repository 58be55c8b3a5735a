//! Location model for reference coordinates

use serde::{Deserialize, Serialize};

/// A (latitude, longitude) pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl ReferencePoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.6}, {:.6}", self.latitude, self.longitude)
    }

    /// Whether both components lie inside the valid degree ranges.
    /// NaN is never in range.
    #[must_use]
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coordinates() {
        let point = ReferencePoint::new(37.5665, 126.978);
        assert_eq!(point.format_coordinates(), "37.566500, 126.978000");
    }

    #[test]
    fn test_is_in_range() {
        assert!(ReferencePoint::new(37.5665, 126.978).is_in_range());
        assert!(ReferencePoint::new(-90.0, 180.0).is_in_range());
        assert!(!ReferencePoint::new(91.0, 0.0).is_in_range());
        assert!(!ReferencePoint::new(0.0, -180.5).is_in_range());
        assert!(!ReferencePoint::new(f64::NAN, 0.0).is_in_range());
    }
}
