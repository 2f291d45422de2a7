//! Schema and row validation.
//!
//! The header must contain every required column or the run aborts. After
//! that, each row either becomes a [`SiteEntry`] or is rejected with a
//! [`RowRejection`]; rejected rows are skipped and counted, never fatal.

use crate::config::SiteMapConfig;
use crate::model::{Coordinates, DisplayValue, Record, SiteEntry, SiteMapError, Table};
use std::fmt;

// ---------------------------------------------------------------------------
// Schema check
// ---------------------------------------------------------------------------

/// Fails with `MissingColumns` if any required column is absent from the
/// header. Missing columns are reported in required order.
pub fn check_required_columns(config: &SiteMapConfig, table: &Table) -> Result<(), SiteMapError> {
    let missing: Vec<String> = config
        .required_columns()
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SiteMapError::MissingColumns {
            missing,
            found: table.headers.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Row rejection
// ---------------------------------------------------------------------------

/// Why a row was skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum RowRejection {
    MissingName,
    MissingClass,
    /// Blank or not a number.
    InvalidLatitude(String),
    InvalidLongitude(String),
    OutOfRange { latitude: f64, longitude: f64 },
}

impl RowRejection {
    /// Stable key used when counting rejections in the run summary.
    pub fn key(&self) -> &'static str {
        match self {
            RowRejection::MissingName => "missing_name",
            RowRejection::MissingClass => "missing_class",
            RowRejection::InvalidLatitude(_) => "invalid_latitude",
            RowRejection::InvalidLongitude(_) => "invalid_longitude",
            RowRejection::OutOfRange { .. } => "out_of_range",
        }
    }
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::MissingName => write!(f, "name is blank"),
            RowRejection::MissingClass => write!(f, "classification is blank"),
            RowRejection::InvalidLatitude(raw) => write!(f, "latitude '{}' is not a number", raw),
            RowRejection::InvalidLongitude(raw) => write!(f, "longitude '{}' is not a number", raw),
            RowRejection::OutOfRange {
                latitude,
                longitude,
            } => write!(f, "coordinates ({}, {}) are out of range", latitude, longitude),
        }
    }
}

// ---------------------------------------------------------------------------
// Row validation
// ---------------------------------------------------------------------------

/// Parses a coordinate cell. Blank and unparsable cells are `None`.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}

/// Validates one row against the schema in `config`.
///
/// `headers` is the sheet header; optional display fields are only read
/// when their column exists there.
pub fn validate_row(
    config: &SiteMapConfig,
    headers: &[String],
    record: &Record,
) -> Result<SiteEntry, RowRejection> {
    let name = record.trimmed(&config.name_field);
    if name.is_empty() {
        return Err(RowRejection::MissingName);
    }

    let class_value = record.trimmed(&config.class_field);
    if class_value.is_empty() {
        return Err(RowRejection::MissingClass);
    }

    let raw_lat = record.trimmed(&config.latitude_field);
    let latitude =
        parse_coordinate(raw_lat).ok_or_else(|| RowRejection::InvalidLatitude(raw_lat.to_string()))?;
    let raw_lon = record.trimmed(&config.longitude_field);
    let longitude =
        parse_coordinate(raw_lon).ok_or_else(|| RowRejection::InvalidLongitude(raw_lon.to_string()))?;

    let coordinates = Coordinates::new(latitude, longitude).ok_or(RowRejection::OutOfRange {
        latitude,
        longitude,
    })?;

    let details = config
        .display_fields
        .iter()
        .filter(|field| headers.iter().any(|h| *h == field.column))
        .filter_map(|field| {
            let value = record.trimmed(&field.column);
            (!value.is_empty()).then(|| DisplayValue {
                label: field.label().to_string(),
                value: value.to_string(),
                kind: field.kind,
            })
        })
        .collect();

    Ok(SiteEntry {
        line: record.line,
        name: name.to_string(),
        class_value: class_value.to_string(),
        coordinates,
        details,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
