//! `ER Finder` - nearby emergency room search and chat trivia bot
//!
//! This library provides facility loading, proximity filtering and ranking,
//! the dashboard HTTP service built on top of it, and the chat-posting job.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod facilities;
pub mod logging;
pub mod messaging;
pub mod models;

// Re-export core types for public API
pub use config::ErFinderConfig;
pub use error::ErFinderError;
pub use facilities::{
    CsvFacilitySource, FacilitySource, FacilityTable, RankedFacility, SearchResult, distance_km,
    filter_and_rank, group_counts_by_category,
};
pub use models::{FacilityRecord, ReferencePoint};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ErFinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
