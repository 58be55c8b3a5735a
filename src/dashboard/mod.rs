//! Dashboard service
//!
//! Serves the nearby emergency room search over HTTP. The facility table is
//! loaded once at startup and shared read-only between requests.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use serde::{Deserialize, Deserializer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::ErFinderError;
use crate::config::DashboardConfig;
use crate::facilities::FacilityTable;
use crate::models::ReferencePoint;

pub mod api;
pub mod views;

/// Shared, read-only request state
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<FacilityTable>,
    pub config: Arc<DashboardConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(table: FacilityTable, config: DashboardConfig) -> Self {
        Self {
            table: Arc::new(table),
            config: Arc::new(config),
        }
    }
}

/// Raw query parameters; anything omitted falls back to the dashboard defaults
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SearchParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius_km: Option<f64>,
    /// Absent means every category, empty means none. The query string
    /// form is comma separated.
    #[serde(default, deserialize_with = "split_categories")]
    pub categories: Option<Vec<String>>,
    pub tiles: Option<String>,
}

fn split_categories<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let list = String::deserialize(deserializer)?;
    Ok(Some(
        list.split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect(),
    ))
}

/// A validated query
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub reference: ReferencePoint,
    pub radius_km: f64,
    /// Allowed categories in request order
    pub categories: Vec<String>,
    pub tiles: String,
}

impl SearchRequest {
    #[must_use]
    pub fn category_set(&self) -> HashSet<String> {
        self.categories.iter().cloned().collect()
    }
}

impl SearchParams {
    /// Restrict the search to `categories`, taken verbatim.
    #[must_use]
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Apply defaults and check the parameters against the configured bounds
    /// and the categories present in `table`.
    pub fn resolve(
        self,
        config: &DashboardConfig,
        table: &FacilityTable,
    ) -> crate::Result<SearchRequest> {
        let reference = ReferencePoint::new(
            self.lat.unwrap_or(config.default_latitude),
            self.lon.unwrap_or(config.default_longitude),
        );
        if !reference.is_in_range() {
            return Err(ErFinderError::validation(format!(
                "coordinates ({}) are out of range",
                reference.format_coordinates()
            )));
        }

        let radius_km = self.radius_km.unwrap_or(config.default_radius_km);
        if !radius_km.is_finite()
            || radius_km < config.min_radius_km
            || radius_km > config.max_radius_km
        {
            return Err(ErFinderError::validation(format!(
                "radius must be between {} and {} km",
                config.min_radius_km, config.max_radius_km
            )));
        }

        let known = table.categories();
        let categories = match self.categories {
            None => known,
            Some(list) => {
                let mut requested: Vec<String> = Vec::new();
                for category in list.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
                    if !known.iter().any(|k| k == category) {
                        return Err(ErFinderError::validation(format!(
                            "unknown category '{category}'"
                        )));
                    }
                    if !requested.iter().any(|r| r == category) {
                        requested.push(category.to_string());
                    }
                }
                requested
            }
        };

        let tiles = match self.tiles {
            None => config.tile_styles.first().cloned().unwrap_or_default(),
            Some(tiles) if config.tile_styles.contains(&tiles) => tiles,
            Some(tiles) => {
                return Err(ErFinderError::validation(format!(
                    "unknown tile style '{tiles}'"
                )));
            }
        };

        Ok(SearchRequest {
            reference,
            radius_km,
            categories,
            tiles,
        })
    }
}

/// Full application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run(config: &DashboardConfig, table: FacilityTable) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(table, config.clone());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind dashboard to {addr}"))?;
    tracing::info!("Dashboard running at http://{}", addr);

    axum::serve(listener, app(state))
        .await
        .context("Dashboard server stopped unexpectedly")?;
    Ok(())
}
