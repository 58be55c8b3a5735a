//! Data models for the ER Finder application
//!
//! - Location: reference coordinates supplied per query
//! - Facility: emergency room records loaded from the data source

pub mod facility;
pub mod location;

// Re-export all public types for convenient access
pub use facility::FacilityRecord;
pub use location::ReferencePoint;
