//! Proximity filtering and ranking of facilities
//!
//! Every query is evaluated in full: distances are recomputed against the
//! reference point, then the radius and category filters are applied and
//! the closest matches are ranked.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;

use serde::Serialize;

use super::distance::distance_km;
use crate::models::{FacilityRecord, ReferencePoint};

/// Number of facilities in the nearest ranking
pub const NEAREST_LIMIT: usize = 3;

/// A facility paired with its distance from the query's reference point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedFacility<'a> {
    pub facility: &'a FacilityRecord,
    pub distance_km: f64,
}

/// Output of [`filter_and_rank`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResult<'a> {
    /// Matches in input order
    pub filtered: Vec<RankedFacility<'a>>,
    /// Up to [`NEAREST_LIMIT`] matches, closest first
    pub nearest: Vec<RankedFacility<'a>>,
}

impl Display for RankedFacility<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.facility.name)?;
        writeln!(f, "   🚩 {}", self.facility.address)?;
        writeln!(f, "   📏 {:.2} km", self.distance_km)?;
        writeln!(f, "   🏷️ {}", self.facility.category)?;
        if !self.facility.emergency_phone.is_empty() {
            writeln!(f, "   ☎️ {}", self.facility.emergency_phone)?;
        }
        Ok(())
    }
}

/// Attach the distance from `reference` to every record, keeping input order.
#[must_use]
pub fn annotate_distances<'a>(
    records: &'a [FacilityRecord],
    reference: &ReferencePoint,
) -> Vec<RankedFacility<'a>> {
    records
        .iter()
        .map(|facility| RankedFacility {
            facility,
            distance_km: distance_km(reference, &facility.location()),
        })
        .collect()
}

/// Select the records within `radius_km` of `reference` whose category is
/// allowed, and rank the closest of them.
///
/// A radius of zero or less only keeps records sitting exactly on the
/// reference point; an empty category set keeps nothing.
#[must_use]
pub fn filter_and_rank<'a>(
    records: &'a [FacilityRecord],
    reference: &ReferencePoint,
    radius_km: f64,
    allowed_categories: &HashSet<String>,
) -> SearchResult<'a> {
    let filtered: Vec<RankedFacility<'a>> = annotate_distances(records, reference)
        .into_iter()
        .filter(|ranked| {
            ranked.distance_km <= radius_km
                && allowed_categories.contains(&ranked.facility.category)
        })
        .collect();

    // sort_by is stable, equal distances keep their input order
    let mut nearest = filtered.clone();
    nearest.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    nearest.truncate(NEAREST_LIMIT);

    SearchResult { filtered, nearest }
}

/// Count the facilities per category, keyed alphabetically.
#[must_use]
pub fn group_counts_by_category<'a>(filtered: &[RankedFacility<'a>]) -> BTreeMap<&'a str, usize> {
    let mut counts = BTreeMap::new();
    for ranked in filtered {
        *counts.entry(ranked.facility.category.as_str()).or_insert(0) += 1;
    }
    counts
}
