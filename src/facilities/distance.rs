use crate::models::ReferencePoint;

/// Mean Earth radius used for all great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers (haversine).
///
/// Coordinates are not range-checked; out-of-range degrees pass through
/// numerically and NaN/Inf inputs propagate into the result.
#[must_use]
pub fn distance_km(from: &ReferencePoint, to: &ReferencePoint) -> f64 {
    let lat_1 = from.latitude.to_radians();
    let lat_2 = to.latitude.to_radians();
    let d_lat = lat_2 - lat_1;
    let d_lon = (to.longitude - from.longitude).to_radians();

    let half_lat = (d_lat / 2.0).sin();
    let half_lon = (d_lon / 2.0).sin();
    // cos terms multiplied first so swapping the points yields the same bits
    let a = half_lat * half_lat + (lat_1.cos() * lat_2.cos()) * (half_lon * half_lon);
    // rounding can push near-antipodal pairs just past 1; NaN must still propagate
    let a = if a > 1.0 { 1.0 } else { a };
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
