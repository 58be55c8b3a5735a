//! Facilities module
//!
//! Loading of emergency room records and the proximity search over them:
//! - CSV data source with load-once table
//! - Haversine distance
//! - Radius/category filtering and nearest ranking
//! - Category marker palette

pub mod distance;
pub mod loader;
pub mod palette;
pub mod search;

pub use distance::{EARTH_RADIUS_KM, distance_km};
pub use loader::{CsvFacilitySource, FacilitySource, FacilityTable};
pub use palette::{FALLBACK_COLOR, MarkerColor, marker_color};
pub use search::{
    NEAREST_LIMIT, RankedFacility, SearchResult, annotate_distances, filter_and_rank,
    group_counts_by_category,
};
