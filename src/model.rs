//! Core data types for the site map generator.
//!
//! This module defines the shared domain model imported by all other modules:
//! the raw sheet table, validated site entries, and the crate error type.
//! It contains no I/O.

use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Raw sheet rows
// ---------------------------------------------------------------------------

/// One CSV row, keyed by column name.
///
/// `line` is the spreadsheet line number: the header is line 1, so the
/// first data row is line 2. Cells missing from a short row read as empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub line: usize,
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            fields: HashMap::new(),
        }
    }

    /// Builder-style insert, mostly handy for tests and in-memory sources.
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: &str, value: &str) {
        self.fields.insert(column.to_string(), value.to_string());
    }

    /// Raw cell value, if the column was present in this row.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Trimmed cell value; empty when the cell is blank or absent.
    pub fn trimmed(&self, column: &str) -> &str {
        self.get(column).map(str::trim).unwrap_or("")
    }
}

/// A parsed sheet: header row in sheet order plus every data row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

// ---------------------------------------------------------------------------
// Validated entries
// ---------------------------------------------------------------------------

/// WGS84 position of a site. Only constructed through [`Coordinates::new`],
/// which enforces the latitude/longitude ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Returns `None` unless latitude is in [-90, 90] and longitude in
    /// [-180, 180]. NaN and infinities are rejected by the same check.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            Some(Self {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Whether an optional field renders as plain text or as a hyperlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Link,
}

/// A populated optional field carried into the description panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayValue {
    pub label: String,
    pub value: String,
    pub kind: FieldKind,
}

/// A row that passed validation and will become a placemark.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteEntry {
    pub line: usize,
    pub name: String,
    pub class_value: String,
    pub coordinates: Coordinates,
    pub details: Vec<DisplayValue>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that abort a generation run. Malformed rows are not errors; they
/// are skipped and counted (see `validate::RowRejection`).
#[derive(Debug, thiserror::Error)]
pub enum SiteMapError {
    /// The configuration is internally inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A TOML configuration file could not be parsed.
    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// No CSV source was configured.
    #[error("SHEET_CSV_URL env var is required (your published CSV link).")]
    MissingSource,

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The HTTP request for the sheet failed outright.
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx HTTP response while fetching the sheet.
    #[error("HTTP error {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// The CSV body could not be parsed.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// One or more required columns are absent from the header row.
    #[error("Missing required columns in CSV: {}. Found: {}", quoted(.missing), quoted(.found))]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

fn quoted(items: &[String]) -> String {
    let inner: Vec<String> = items.iter().map(|s| format!("'{}'", s)).collect();
    format!("[{}]", inner.join(", "))
}

impl SiteMapError {
    pub fn io(path: impl fmt::Display, source: std::io::Error) -> Self {
        SiteMapError::Io {
            path: path.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_accept_range_boundaries() {
        assert!(Coordinates::new(90.0, 180.0).is_some());
        assert!(Coordinates::new(-90.0, -180.0).is_some());
        assert!(Coordinates::new(0.0, 0.0).is_some());
    }

    #[test]
    fn test_coordinates_reject_out_of_range_and_non_finite() {
        assert!(Coordinates::new(90.0001, 0.0).is_none());
        assert!(Coordinates::new(0.0, -180.5).is_none());
        assert!(Coordinates::new(f64::NAN, 0.0).is_none());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_record_trimmed_treats_absent_cells_as_blank() {
        let record = Record::new(2).with("Name", "  Tower 7  ");
        assert_eq!(record.trimmed("Name"), "Tower 7");
        assert_eq!(record.trimmed("Notes"), "");
        assert_eq!(record.get("Notes"), None);
    }

    #[test]
    fn test_missing_columns_message_lists_both_sides() {
        let err = SiteMapError::MissingColumns {
            missing: vec!["Latitude".to_string()],
            found: vec!["Name".to_string(), "Category".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required columns in CSV: ['Latitude']. Found: ['Name', 'Category']"
        );
    }
}
