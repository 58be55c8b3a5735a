//! Map marker colors per facility category

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Blue,
    Green,
    Purple,
    Gray,
}

impl MarkerColor {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerColor::Red => "red",
            MarkerColor::Blue => "blue",
            MarkerColor::Green => "green",
            MarkerColor::Purple => "purple",
            MarkerColor::Gray => "gray",
        }
    }
}

/// Color for categories missing from [`CATEGORY_COLORS`]
pub const FALLBACK_COLOR: MarkerColor = MarkerColor::Gray;

/// Legend: top-tier comprehensive, comprehensive, hospital, clinic
pub const CATEGORY_COLORS: [(&str, MarkerColor); 4] = [
    ("상급종합", MarkerColor::Red),
    ("종합", MarkerColor::Blue),
    ("병원", MarkerColor::Green),
    ("의원", MarkerColor::Purple),
];

#[must_use]
pub fn marker_color(category: &str) -> MarkerColor {
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| *name == category)
        .map_or(FALLBACK_COLOR, |(_, color)| *color)
}
