//! Presentation-ready shapes for the dashboard: cards, table rows,
//! chart counts, map markers and the CSV export.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::facilities::{
    FALLBACK_COLOR, MarkerColor, RankedFacility, SearchResult, group_counts_by_category,
    marker_color, palette::CATEGORY_COLORS,
};
use crate::config::DashboardConfig;
use crate::models::ReferencePoint;
use crate::{ErFinderError, Result};

use super::SearchRequest;

const SEARCH_URL: &str = "https://search.naver.com/search.naver?query=";

/// CSV download file name
pub const EXPORT_FILE_NAME: &str = "filtered_emer.csv";

#[derive(Debug, Clone, Serialize)]
pub struct FacilityRow {
    pub name: String,
    pub address: String,
    pub category: String,
    pub distance_km: f64,
    pub phone: String,
    pub emergency_phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FacilityCard {
    pub name: String,
    pub address: String,
    pub distance: String,
    pub category: String,
    pub search_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub popup: String,
    pub color: MarkerColor,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: ReferencePoint,
    pub zoom: u8,
    pub tiles: String,
    pub markers: Vec<MapMarker>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    pub category: &'static str,
    pub color: MarkerColor,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
    pub fallback: MarkerColor,
}

/// Sidebar control bounds and defaults
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSettings {
    pub default_reference: ReferencePoint,
    pub default_radius_km: f64,
    pub min_radius_km: f64,
    pub max_radius_km: f64,
    pub radius_step_km: f64,
    pub map_zoom: u8,
    pub tile_styles: Vec<String>,
}

impl From<&DashboardConfig> for DashboardSettings {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            default_reference: ReferencePoint::new(
                config.default_latitude,
                config.default_longitude,
            ),
            default_radius_km: config.default_radius_km,
            min_radius_km: config.min_radius_km,
            max_radius_km: config.max_radius_km,
            radius_step_km: config.radius_step_km,
            map_zoom: config.map_zoom,
            tile_styles: config.tile_styles.clone(),
        }
    }
}

/// Everything the dashboard renders for one query
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub reference: ReferencePoint,
    pub radius_km: f64,
    pub categories: Vec<String>,
    pub total: usize,
    pub facilities: Vec<FacilityRow>,
    pub nearest: Vec<FacilityCard>,
    pub counts: Vec<CategoryCount>,
    pub map: MapView,
    pub generated_at: DateTime<Utc>,
}

impl From<&RankedFacility<'_>> for FacilityRow {
    fn from(ranked: &RankedFacility<'_>) -> Self {
        let facility = ranked.facility;
        Self {
            name: facility.name.clone(),
            address: facility.address.clone(),
            category: facility.category.clone(),
            distance_km: ranked.distance_km,
            phone: facility.phone.clone(),
            emergency_phone: facility.emergency_phone.clone(),
        }
    }
}

impl From<&RankedFacility<'_>> for FacilityCard {
    fn from(ranked: &RankedFacility<'_>) -> Self {
        let facility = ranked.facility;
        Self {
            name: facility.name.clone(),
            address: facility.address.clone(),
            distance: format!("{:.2} km", ranked.distance_km),
            category: facility.category.clone(),
            search_url: format!("{SEARCH_URL}{}", urlencoding::encode(&facility.name)),
        }
    }
}

impl From<&RankedFacility<'_>> for MapMarker {
    fn from(ranked: &RankedFacility<'_>) -> Self {
        let facility = ranked.facility;
        Self {
            latitude: facility.latitude,
            longitude: facility.longitude,
            popup: format!("{} ({:.2} km)", facility.name, ranked.distance_km),
            color: marker_color(&facility.category),
        }
    }
}

impl Legend {
    #[must_use]
    pub fn current() -> Self {
        Self {
            entries: CATEGORY_COLORS
                .iter()
                .map(|&(category, color)| LegendEntry { category, color })
                .collect(),
            fallback: FALLBACK_COLOR,
        }
    }
}

impl SearchResponse {
    #[must_use]
    pub fn build(
        request: &SearchRequest,
        result: &SearchResult<'_>,
        zoom: u8,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let counts = group_counts_by_category(&result.filtered)
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect();

        Self {
            reference: request.reference,
            radius_km: request.radius_km,
            categories: request.categories.clone(),
            total: result.filtered.len(),
            facilities: result.filtered.iter().map(FacilityRow::from).collect(),
            nearest: result.nearest.iter().map(FacilityCard::from).collect(),
            counts,
            map: MapView {
                center: request.reference,
                zoom,
                tiles: request.tiles.clone(),
                markers: result.filtered.iter().map(MapMarker::from).collect(),
            },
            generated_at,
        }
    }
}

#[derive(Serialize)]
struct ExportRow<'a> {
    name: &'a str,
    address: &'a str,
    #[serde(rename = "type")]
    category: &'a str,
    lat: f64,
    lon: f64,
    #[serde(rename = "대표전화1")]
    phone: &'a str,
    #[serde(rename = "응급실전화")]
    emergency_phone: &'a str,
    distance: f64,
}

/// Serialize the filtered facilities as CSV, header included even when empty.
pub fn export_csv(filtered: &[RankedFacility<'_>]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record([
        "name", "address", "type", "lat", "lon", "대표전화1", "응급실전화", "distance",
    ])?;

    for ranked in filtered {
        let facility = ranked.facility;
        writer.serialize(ExportRow {
            name: &facility.name,
            address: &facility.address,
            category: &facility.category,
            lat: facility.latitude,
            lon: facility.longitude,
            phone: &facility.phone,
            emergency_phone: &facility.emergency_phone,
            distance: ranked.distance_km,
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ErFinderError::data(format!("Failed to flush CSV export: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| ErFinderError::data(format!("CSV export is not UTF-8: {e}")))
}
