//! Run configuration for the site map generator.
//!
//! Layering, lowest to highest precedence:
//!   built-in defaults < TOML config file < environment < CLI flags
//!
//! The CLI layer lives in `main.rs`. Environment lookup is passed in as a
//! closure so tests can exercise overrides without touching the process
//! environment.

use crate::model::{FieldKind, SiteMapError};
use crate::styles::{self, StyleRule, DEFAULT_ICON_URL};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// Environment variable names
// ---------------------------------------------------------------------------

/// Published CSV link of the sheet.
pub const ENV_CSV_URL: &str = "SHEET_CSV_URL";
/// Public URL the network link should point at (where `sites.kml` is hosted).
pub const ENV_DATASET_URL: &str = "DATASET_URL";
/// Client refresh interval, in seconds.
pub const ENV_REFRESH_SECONDS: &str = "REFRESH_SECONDS";

pub const DEFAULT_DATASET_NAME: &str = "FLG/TwiceAsNice MeshCore Site Map";
pub const DEFAULT_DATASET_URL: &str = "https://txkbaldlaw.github.io/meshnodes-site-map/sites.kml";
pub const DEFAULT_REFRESH_SECONDS: u64 = 600; // 10 minutes

// ---------------------------------------------------------------------------
// Optional display fields
// ---------------------------------------------------------------------------

/// An optional sheet column shown in the description panel when populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayField {
    pub column: String,
    /// Label shown in the panel; defaults to the column name.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub kind: FieldKind,
}

impl DisplayField {
    fn text(column: &str) -> Self {
        DisplayField {
            column: column.to_string(),
            label: None,
            kind: FieldKind::Text,
        }
    }

    fn link(column: &str) -> Self {
        DisplayField {
            kind: FieldKind::Link,
            ..DisplayField::text(column)
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.column)
    }
}

fn default_display_fields() -> Vec<DisplayField> {
    vec![
        DisplayField::text("Street Address"),
        DisplayField::text("Proposed By"),
        DisplayField::text("Assigned To"),
        DisplayField::text("Node Owner"),
        DisplayField::text("Installed Node Name"),
        DisplayField::text("FCC ID"),
        DisplayField::link("FCC Link"),
        DisplayField::text("Notes"),
    ]
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteMapConfig {
    /// Shown as the document and network link name.
    pub dataset_name: String,
    /// CSV source: an http(s) URL or a local file path.
    pub csv_url: Option<String>,
    /// Where the generated dataset will be published.
    pub dataset_url: Option<String>,
    /// Used for the network link when `dataset_url` is unset.
    pub fallback_dataset_url: String,
    pub refresh_seconds: u64,

    pub output_kml: String,
    pub output_networklink: String,

    // Schema: the four required columns.
    pub name_field: String,
    pub latitude_field: String,
    pub longitude_field: String,
    /// Classification column, e.g. "Category", "Node Class" or "Node Status".
    pub class_field: String,
    /// Label for the classification value in the description panel.
    pub class_label: String,

    pub display_fields: Vec<DisplayField>,

    /// Styles in emission order; also the folder order.
    pub styles: Vec<StyleRule>,
    pub default_icon: String,
    pub icon_scale: f64,
    pub label_scale: f64,
    /// One folder per classification value instead of a flat placemark list.
    pub group_into_folders: bool,
}

impl Default for SiteMapConfig {
    fn default() -> Self {
        SiteMapConfig {
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            csv_url: None,
            dataset_url: None,
            fallback_dataset_url: DEFAULT_DATASET_URL.to_string(),
            refresh_seconds: DEFAULT_REFRESH_SECONDS,
            output_kml: "sites.kml".to_string(),
            output_networklink: "networklink.kml".to_string(),
            name_field: "Name".to_string(),
            latitude_field: "Latitude".to_string(),
            longitude_field: "Longitude".to_string(),
            class_field: "Category".to_string(),
            class_label: "Status".to_string(),
            display_fields: default_display_fields(),
            styles: styles::default_rules(),
            default_icon: DEFAULT_ICON_URL.to_string(),
            icon_scale: 1.1,
            label_scale: 0.9,
            group_into_folders: true,
        }
    }
}

impl SiteMapConfig {
    /// Parses a TOML config. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, SiteMapError> {
        toml::from_str(text).map_err(|source| SiteMapError::ConfigParse {
            path: origin.to_string(),
            source,
        })
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self, SiteMapError> {
        let text = std::fs::read_to_string(path).map_err(|e| SiteMapError::io(path.display(), e))?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    /// Applies `SHEET_CSV_URL`, `DATASET_URL` and `REFRESH_SECONDS`.
    ///
    /// Values are trimmed and blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), SiteMapError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(url) = read(ENV_CSV_URL) {
            self.csv_url = Some(url);
        }
        if let Some(url) = read(ENV_DATASET_URL) {
            self.dataset_url = Some(url);
        }
        if let Some(raw) = read(ENV_REFRESH_SECONDS) {
            self.refresh_seconds = raw.parse().map_err(|_| {
                SiteMapError::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_REFRESH_SECONDS, raw
                ))
            })?;
        }
        Ok(())
    }

    /// Checks the configuration for values that would produce a broken
    /// document.
    pub fn validate(&self) -> Result<(), SiteMapError> {
        for (key, value) in [
            ("dataset_name", &self.dataset_name),
            ("name_field", &self.name_field),
            ("latitude_field", &self.latitude_field),
            ("longitude_field", &self.longitude_field),
            ("class_field", &self.class_field),
            ("output_kml", &self.output_kml),
            ("output_networklink", &self.output_networklink),
        ] {
            if value.trim().is_empty() {
                return Err(SiteMapError::Config(format!("{} must not be empty", key)));
            }
        }

        if self.output_kml == self.output_networklink {
            return Err(SiteMapError::Config(format!(
                "output_kml and output_networklink are both '{}'",
                self.output_kml
            )));
        }

        if self.refresh_seconds == 0 {
            return Err(SiteMapError::Config(
                "refresh_seconds must be greater than zero".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for rule in &self.styles {
            if rule.value.trim().is_empty() {
                return Err(SiteMapError::Config("style value must not be empty".to_string()));
            }
            if !styles::is_valid_kml_color(&rule.color) {
                return Err(SiteMapError::Config(format!(
                    "style '{}' has color '{}'; expected 8 hex digits (AABBGGRR)",
                    rule.value, rule.color
                )));
            }
            if !seen.insert(rule.value.as_str()) {
                return Err(SiteMapError::Config(format!(
                    "style '{}' is defined more than once",
                    rule.value
                )));
            }
        }

        Ok(())
    }

    /// The columns that must exist in the sheet header, in reporting order.
    pub fn required_columns(&self) -> [&str; 4] {
        [
            self.name_field.as_str(),
            self.latitude_field.as_str(),
            self.longitude_field.as_str(),
            self.class_field.as_str(),
        ]
    }

    /// URL the network link points at. A blank `dataset_url`, from any
    /// layer, counts as unset.
    pub fn dataset_href(&self) -> &str {
        self.dataset_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.fallback_dataset_url)
    }

    pub fn refresh_minutes(&self) -> u64 {
        self.refresh_seconds / 60
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
