//! Built-in style registry for the site map.
//!
//! Defines the default classification values the sheet uses, along with the
//! KML icon color and icon image for each. A config file may replace this
//! list (see `config::SiteMapConfig::styles`); this registry is what a run
//! uses when no file is given.
//!
//! Colors are KML `AABBGGRR` strings: alpha, blue, green, red. That order is
//! the reverse of the usual web `RRGGBB`, so a "red" entry is `ff0000ff`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Icon URLs (Google Earth built-in paddles)
// ---------------------------------------------------------------------------

/// Icon used by any style that does not name its own.
pub const DEFAULT_ICON_URL: &str = "http://maps.google.com/mapfiles/kml/paddle/wht-blank.png";

const ICON_GREEN_STARS: &str = "http://maps.google.com/mapfiles/kml/paddle/grn-stars.png";
const ICON_GREEN_BLANK: &str = "http://maps.google.com/mapfiles/kml/paddle/grn-blank.png";
const ICON_WHITE_BLANK: &str = "http://maps.google.com/mapfiles/kml/paddle/wht-blank.png";
const ICON_CROSS: &str = "http://maps.google.com/mapfiles/kml/paddle/X.png";

// ---------------------------------------------------------------------------
// Style metadata
// ---------------------------------------------------------------------------

/// Static description of one classification style.
pub struct StyleDef {
    /// Classification value as it appears in the sheet, e.g. "Suggested".
    pub value: &'static str,
    /// KML color, `AABBGGRR`.
    pub color: &'static str,
    /// Icon image; `None` falls back to [`DEFAULT_ICON_URL`].
    pub icon: Option<&'static str>,
}

/// Owned, configurable form of a style, as read from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub value: String,
    pub color: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl StyleRule {
    /// Icon to render, falling back to `default_icon` when unset or blank.
    pub fn icon_or<'a>(&'a self, default_icon: &'a str) -> &'a str {
        match self.icon.as_deref().map(str::trim) {
            Some(icon) if !icon.is_empty() => icon,
            _ => default_icon,
        }
    }
}

impl From<&StyleDef> for StyleRule {
    fn from(def: &StyleDef) -> Self {
        StyleRule {
            value: def.value.to_string(),
            color: def.color.to_string(),
            icon: def.icon.map(String::from),
        }
    }
}

/// Site workflow categories, in the order their styles are emitted.
/// The comment on each color is the color it renders as.
pub static STYLE_REGISTRY: &[StyleDef] = &[
    StyleDef {
        value: "Owner Approved",
        color: "ff00ff00", // green
        icon: Some(ICON_GREEN_BLANK),
    },
    StyleDef {
        value: "Group Approved",
        color: "fffeb900", // mid blue
        icon: None,
    },
    StyleDef {
        value: "Node Installed",
        color: "ff00ff00", // green
        icon: Some(ICON_GREEN_STARS),
    },
    StyleDef {
        value: "Suggested",
        color: "ffeeff00", // light blue
        icon: Some(ICON_WHITE_BLANK),
    },
    StyleDef {
        value: "Owner Requested",
        color: "ffda00ff", // purple
        icon: None,
    },
    StyleDef {
        value: "Owner Rejected",
        color: "ff000000", // black
        icon: Some(ICON_CROSS),
    },
    StyleDef {
        value: "Group Rejected",
        color: "ff0000ff", // red
        icon: Some(ICON_CROSS),
    },
];

/// The registry as owned rules, ready to drop into a config.
pub fn default_rules() -> Vec<StyleRule> {
    STYLE_REGISTRY.iter().map(StyleRule::from).collect()
}

/// True if `color` is a well-formed KML `AABBGGRR` color.
pub fn is_valid_kml_color(color: &str) -> bool {
    color.len() == 8 && color.chars().all(|c| c.is_ascii_hexdigit())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn find_style(value: &str) -> Option<&'static StyleDef> {
        STYLE_REGISTRY.iter().find(|s| s.value == value)
    }

    #[test]
    fn test_all_registry_colors_are_valid_kml_format() {
        for style in STYLE_REGISTRY {
            assert!(
                is_valid_kml_color(style.color),
                "color for '{}' should be 8 hex digits (AABBGGRR), got '{}'",
                style.value,
                style.color
            );
        }
    }

    #[test]
    fn test_no_duplicate_style_values() {
        let mut seen = std::collections::HashSet::new();
        for style in STYLE_REGISTRY {
            assert!(
                seen.insert(style.value),
                "duplicate style value '{}' found in STYLE_REGISTRY",
                style.value
            );
        }
    }

    #[test]
    fn test_registry_contains_sheet_workflow_categories() {
        let expected = [
            "Owner Approved",
            "Group Approved",
            "Node Installed",
            "Suggested",
            "Owner Requested",
            "Owner Rejected",
            "Group Rejected",
        ];
        for value in &expected {
            assert!(
                find_style(value).is_some(),
                "STYLE_REGISTRY missing expected category '{}'",
                value
            );
        }
    }

    #[test]
    fn test_find_style_returns_none_for_unknown_value() {
        assert!(find_style("Decommissioned").is_none());
        // Lookups are exact; the sheet's casing is authoritative.
        assert!(find_style("suggested").is_none());
    }

    #[test]
    fn test_icon_falls_back_to_default_when_unset() {
        let rule = StyleRule::from(find_style("Group Approved").unwrap());
        assert_eq!(rule.icon_or(DEFAULT_ICON_URL), DEFAULT_ICON_URL);

        let blank = StyleRule {
            value: "X".to_string(),
            color: "ff000000".to_string(),
            icon: Some("   ".to_string()),
        };
        assert_eq!(blank.icon_or(DEFAULT_ICON_URL), DEFAULT_ICON_URL);

        let rejected = StyleRule::from(find_style("Group Rejected").unwrap());
        assert_eq!(rejected.icon_or(DEFAULT_ICON_URL), ICON_CROSS);
    }

    #[test]
    fn test_is_valid_kml_color_rejects_malformed_values() {
        assert!(is_valid_kml_color("FF00ff00"));
        assert!(!is_valid_kml_color("00ff00"));
        assert!(!is_valid_kml_color("#ff00ff00"));
        assert!(!is_valid_kml_color("gg00ff00"));
    }

    #[test]
    fn test_default_rules_preserve_registry_order() {
        let values: Vec<_> = default_rules().into_iter().map(|r| r.value).collect();
        let registry: Vec<_> = STYLE_REGISTRY.iter().map(|s| s.value.to_string()).collect();
        assert_eq!(values, registry);
    }
}
