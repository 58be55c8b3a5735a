//! Emergency room facility records

use serde::{Deserialize, Serialize};

use super::ReferencePoint;

/// One emergency-capable medical facility.
///
/// Records are immutable once loaded and owned by the
/// [`FacilityTable`](crate::facilities::FacilityTable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub name: String,
    pub address: String,
    /// Facility classification, e.g. `상급종합` or `의원`
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: String,
    /// Direct line of the emergency room
    pub emergency_phone: String,
}

impl FacilityRecord {
    #[must_use]
    pub fn location(&self) -> ReferencePoint {
        ReferencePoint::new(self.latitude, self.longitude)
    }
}
