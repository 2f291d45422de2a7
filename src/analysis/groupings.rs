//! Classification grouping.
//!
//! Groups are ordered deterministically: configured style values first, in
//! configuration order, then unstyled values in lexical order. Entries keep
//! their sheet order inside a group. Values with no entries produce no
//! group.

use crate::config::SiteMapConfig;
use crate::model::SiteEntry;
use std::collections::BTreeMap;

/// All entries sharing one classification value.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassGroup {
    pub value: String,
    /// Id of the shared style, or `None` for values with no configured style.
    pub style_id: Option<String>,
    pub entries: Vec<SiteEntry>,
}

impl ClassGroup {
    pub fn is_styled(&self) -> bool {
        self.style_id.is_some()
    }
}

/// Splits `entries` into ordered classification groups.
pub fn group_by_class(config: &SiteMapConfig, entries: Vec<SiteEntry>) -> Vec<ClassGroup> {
    let mut by_value: BTreeMap<String, Vec<SiteEntry>> = BTreeMap::new();
    for entry in entries {
        by_value
            .entry(entry.class_value.clone())
            .or_default()
            .push(entry);
    }

    let mut groups = Vec::with_capacity(by_value.len());

    for rule in &config.styles {
        if let Some(entries) = by_value.remove(&rule.value) {
            groups.push(ClassGroup {
                value: rule.value.clone(),
                style_id: Some(rule.value.clone()),
                entries,
            });
        }
    }

    // BTreeMap drains in lexical order
    groups.extend(by_value.into_iter().map(|(value, entries)| ClassGroup {
        value,
        style_id: None,
        entries,
    }));

    groups
}

/// Placemark count per classification value.
pub fn class_counts(groups: &[ClassGroup]) -> BTreeMap<String, usize> {
    groups
        .iter()
        .map(|g| (g.value.clone(), g.entries.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;

    fn entry(line: usize, name: &str, class_value: &str) -> SiteEntry {
        SiteEntry {
            line,
            name: name.to_string(),
            class_value: class_value.to_string(),
            coordinates: Coordinates::new(32.0, -97.0).unwrap(),
            details: vec![],
        }
    }

    #[test]
    fn test_styled_groups_follow_config_order() {
        let config = SiteMapConfig::default();
        let groups = group_by_class(
            &config,
            vec![
                entry(2, "a", "Group Rejected"),
                entry(3, "b", "Suggested"),
                entry(4, "c", "Owner Approved"),
            ],
        );
        let values: Vec<_> = groups.iter().map(|g| g.value.as_str()).collect();
        assert_eq!(values, vec!["Owner Approved", "Suggested", "Group Rejected"]);
        assert!(groups.iter().all(ClassGroup::is_styled));
    }

    #[test]
    fn test_unstyled_groups_come_last_in_lexical_order() {
        let config = SiteMapConfig::default();
        let groups = group_by_class(
            &config,
            vec![
                entry(2, "a", "Zoning Review"),
                entry(3, "b", "Suggested"),
                entry(4, "c", "Awaiting Survey"),
            ],
        );
        let values: Vec<_> = groups.iter().map(|g| g.value.as_str()).collect();
        assert_eq!(values, vec!["Suggested", "Awaiting Survey", "Zoning Review"]);
        assert_eq!(groups[1].style_id, None);
        assert_eq!(groups[0].style_id.as_deref(), Some("Suggested"));
    }

    #[test]
    fn test_entries_keep_sheet_order_within_group() {
        let config = SiteMapConfig::default();
        let groups = group_by_class(
            &config,
            vec![
                entry(2, "first", "Suggested"),
                entry(3, "other", "Owner Approved"),
                entry(4, "second", "Suggested"),
                entry(5, "third", "Suggested"),
            ],
        );
        let suggested = groups.iter().find(|g| g.value == "Suggested").unwrap();
        let names: Vec<_> = suggested.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        let config = SiteMapConfig::default();
        assert!(group_by_class(&config, vec![]).is_empty());
    }

    #[test]
    fn test_class_counts() {
        let config = SiteMapConfig::default();
        let groups = group_by_class(
            &config,
            vec![
                entry(2, "a", "Suggested"),
                entry(3, "b", "Suggested"),
                entry(4, "c", "Other"),
            ],
        );
        let counts = class_counts(&groups);
        assert_eq!(counts.get("Suggested"), Some(&2));
        assert_eq!(counts.get("Other"), Some(&1));
    }
}
