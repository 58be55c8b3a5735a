//! Facility data loading
//!
//! Reads the emergency room CSV export, keeps the facilities that operate
//! an emergency room and maps the source columns onto [`FacilityRecord`].

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::models::FacilityRecord;
use crate::{ErFinderError, Result};

/// Anything able to produce the full facility collection
pub trait FacilitySource {
    fn load(&self) -> Result<FacilityTable>;
}

/// Raw CSV row, column names as published in the source file
#[derive(Debug, Deserialize)]
struct CsvFacilityRow {
    #[serde(rename = "기관명")]
    name: String,
    #[serde(rename = "주소", default)]
    address: String,
    #[serde(rename = "병원분류명", default)]
    category: String,
    #[serde(rename = "병원위도", deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(rename = "병원경도", deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
    #[serde(rename = "대표전화1", default)]
    phone: String,
    #[serde(rename = "응급실전화", default)]
    emergency_phone: String,
    #[serde(rename = "응급실운영여부", deserialize_with = "csv::invalid_option")]
    emergency_room_operating: Option<f64>,
}

impl CsvFacilityRow {
    fn is_operating(&self) -> bool {
        self.emergency_room_operating == Some(1.0)
    }

    fn into_record(self) -> std::result::Result<FacilityRecord, String> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Ok(FacilityRecord {
                name: self.name,
                address: self.address,
                category: self.category,
                latitude,
                longitude,
                phone: self.phone,
                emergency_phone: self.emergency_phone,
            }),
            _ => Err(format!("missing coordinates for {}", self.name)),
        }
    }
}

/// Facility CSV file on disk
pub struct CsvFacilitySource {
    path: PathBuf,
    encoding: &'static Encoding,
}

impl CsvFacilitySource {
    /// Create a source for `path` decoded with the WHATWG `encoding_label`
    pub fn new<P: AsRef<Path>>(path: P, encoding_label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(encoding_label.as_bytes()).ok_or_else(|| {
            ErFinderError::config(format!("Unknown CSV encoding '{encoding_label}'"))
        })?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            encoding,
        })
    }
}

impl FacilitySource for CsvFacilitySource {
    fn load(&self) -> Result<FacilityTable> {
        info!("Loading facilities from: {:?}", self.path);

        if !self.path.exists() {
            return Err(ErFinderError::data(format!(
                "Facility file not found: {}",
                self.path.display()
            )));
        }

        let bytes = fs::read(&self.path)?;
        let (content, used_encoding, had_errors) = self.encoding.decode(&bytes);
        if had_errors {
            warn!(
                "Facility file is not valid {}, malformed sequences were replaced",
                used_encoding.name()
            );
        }

        FacilityTable::from_csv_str(&content)
    }
}

/// Immutable, load-once collection of facilities
#[derive(Debug, Clone, Default)]
pub struct FacilityTable {
    records: Vec<FacilityRecord>,
}

impl FacilityTable {
    #[must_use]
    pub fn new(records: Vec<FacilityRecord>) -> Self {
        Self { records }
    }

    /// Parse decoded CSV text, keeping only facilities with an operating
    /// emergency room.
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let mut records = Vec::new();
        let mut skipped_closed = 0;
        let mut parse_errors = 0;

        for row in reader.deserialize::<CsvFacilityRow>() {
            let row = row?;
            if !row.is_operating() {
                skipped_closed += 1;
                continue;
            }
            match row.into_record() {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Skipping facility row: {}", e);
                    parse_errors += 1;
                }
            }
        }

        debug!("Skipped {} facilities without an emergency room", skipped_closed);
        info!(
            "Loaded {} facilities ({} rows without coordinates)",
            records.len(),
            parse_errors
        );

        Ok(Self { records })
    }

    #[must_use]
    pub fn records(&self) -> &[FacilityRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct categories in order of first appearance
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|record| seen.insert(record.category.as_str()))
            .map(|record| record.category.clone())
            .collect()
    }
}
