//! Generation pipeline
//!
//! `rows → validated entries → classification groups → rendered documents`
//!
//! [`generate`] is the pure transform; [`run`] wires it to a row source and
//! an output sink. The generation time is always passed in, so the same
//! table and timestamp produce byte-identical documents.

use crate::analysis::groupings::{class_counts, group_by_class};
use crate::config::SiteMapConfig;
use crate::ingest::sheet::{is_remote, RowSource};
use crate::logging;
use crate::model::{SiteMapError, Table};
use crate::output::OutputSink;
use crate::render::{self, kml};
use crate::validate::{check_required_columns, validate_row};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Run Results
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub source: Option<String>,
    pub rows_read: usize,
    pub placemarks_written: usize,
    pub rows_skipped: usize,
    /// Skipped rows per rejection reason key.
    pub skipped_by_reason: BTreeMap<String, usize>,
    pub placemarks_by_class: BTreeMap<String, usize>,
    /// Classification values that rendered without a style.
    pub unstyled_classes: Vec<String>,
    /// Where each document was written.
    pub outputs: Vec<String>,
}

/// Both rendered documents plus the run totals.
#[derive(Debug, Clone)]
pub struct GeneratedDocuments {
    pub dataset: String,
    pub network_link: String,
    pub summary: RunSummary,
}

// ============================================================================
// Pipeline
// ============================================================================

/// Validates, groups and renders `table`.
///
/// Fails only on configuration errors or missing required columns; bad
/// rows are skipped and counted.
pub fn generate(
    config: &SiteMapConfig,
    table: &Table,
    now: DateTime<Utc>,
) -> Result<GeneratedDocuments, SiteMapError> {
    config.validate()?;
    check_required_columns(config, table)?;

    let mut entries = Vec::with_capacity(table.records.len());
    let mut skipped_by_reason: BTreeMap<String, usize> = BTreeMap::new();

    for record in &table.records {
        match validate_row(config, &table.headers, record) {
            Ok(entry) => entries.push(entry),
            Err(rejection) => {
                logging::log_skipped_row(
                    record.line,
                    record.trimmed(&config.name_field),
                    &rejection,
                );
                *skipped_by_reason.entry(rejection.key().to_string()).or_default() += 1;
            }
        }
    }

    let placemarks_written = entries.len();
    let rows_skipped = table.records.len() - placemarks_written;

    let groups = group_by_class(config, entries);
    let unstyled_classes: Vec<String> = groups
        .iter()
        .filter(|g| !g.is_styled())
        .map(|g| g.value.clone())
        .collect();
    for value in &unstyled_classes {
        tracing::warn!(class = %value, "no style configured; placemarks render unstyled");
    }

    let updated = render::format_timestamp(now);
    let dataset = kml::render_dataset(config, &groups, &updated, rows_skipped);
    let network_link = kml::render_network_link(config);

    let summary = RunSummary {
        generated_at: now.to_rfc3339(),
        source: None,
        rows_read: table.records.len(),
        placemarks_written,
        rows_skipped,
        skipped_by_reason,
        placemarks_by_class: class_counts(&groups),
        unstyled_classes,
        outputs: Vec::new(),
    };

    Ok(GeneratedDocuments {
        dataset,
        network_link,
        summary,
    })
}

/// Fetches the configured sheet, generates both documents and hands them to
/// `sink`: the dataset first, then the network link.
pub fn run(
    config: &SiteMapConfig,
    source: &dyn RowSource,
    sink: &mut dyn OutputSink,
    now: DateTime<Utc>,
) -> Result<RunSummary, SiteMapError> {
    let csv_source = config
        .csv_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(SiteMapError::MissingSource)?;

    logging::log_fetch(csv_source, is_remote(csv_source));
    let table = source.fetch_table(csv_source)?;
    tracing::debug!(
        columns = table.headers.len(),
        rows = table.records.len(),
        "sheet parsed"
    );

    let GeneratedDocuments {
        dataset,
        network_link,
        mut summary,
    } = generate(config, &table, now)?;

    summary.source = Some(csv_source.to_string());
    summary
        .outputs
        .push(sink.write_document(&config.output_kml, &dataset)?);
    summary
        .outputs
        .push(sink.write_document(&config.output_networklink, &network_link)?);

    logging::log_run_summary(
        summary.rows_read,
        summary.placemarks_written,
        summary.rows_skipped,
    );

    Ok(summary)
}

// ============================================================================
// Reporting
// ============================================================================

/// The one-line completion message printed after a successful run.
pub fn completion_message(config: &SiteMapConfig, summary: &RunSummary) -> String {
    format!(
        "Wrote {} and {}. Skipped {} rows missing required fields.",
        config.output_kml, config.output_networklink, summary.rows_skipped
    )
}

pub fn print_summary(summary: &RunSummary) {
    println!("Generated:   {}", summary.generated_at);
    if let Some(source) = &summary.source {
        println!("Source:      {}", source);
    }
    println!(
        "Rows:        {} read, {} rendered, {} skipped",
        summary.rows_read, summary.placemarks_written, summary.rows_skipped
    );
    for (reason, count) in &summary.skipped_by_reason {
        println!("  skipped {:<18} {}", reason, count);
    }
    for (class, count) in &summary.placemarks_by_class {
        let marker = if summary.unstyled_classes.contains(class) {
            " (unstyled)"
        } else {
            ""
        };
        println!("  {:<26} {}{}", class, count, marker);
    }
    for output in &summary.outputs {
        println!("Wrote:       {}", output);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap()
    }

    fn table(rows: Vec<Record>) -> Table {
        Table {
            headers: ["Name", "Latitude", "Longitude", "Category"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            records: rows,
        }
    }

    fn row(line: usize, name: &str, lat: &str, lon: &str, class: &str) -> Record {
        Record::new(line)
            .with("Name", name)
            .with("Latitude", lat)
            .with("Longitude", lon)
            .with("Category", class)
    }

    #[test]
    fn test_generate_counts_rendered_and_skipped_rows() {
        let config = SiteMapConfig::default();
        let t = table(vec![
            row(2, "Good", "32.1", "-97.1", "Suggested"),
            row(3, "", "32.1", "-97.1", "Suggested"),
            row(4, "Far", "95", "-97.1", "Suggested"),
            row(5, "Odd", "32.2", "-97.2", "Unlisted"),
        ]);

        let docs = generate(&config, &t, fixed_now()).unwrap();
        let s = &docs.summary;
        assert_eq!(s.rows_read, 4);
        assert_eq!(s.placemarks_written, 2);
        assert_eq!(s.rows_skipped, 2);
        assert_eq!(s.skipped_by_reason.get("missing_name"), Some(&1));
        assert_eq!(s.skipped_by_reason.get("out_of_range"), Some(&1));
        assert_eq!(s.unstyled_classes, vec!["Unlisted"]);
        assert_eq!(s.generated_at, "2025-06-01T12:30:00+00:00");

        assert_eq!(docs.dataset.matches("<Placemark>").count(), 2);
        assert!(docs.dataset.contains("Rows skipped (missing/invalid required fields): 2"));
        assert!(docs.dataset.contains("Updated (UTC): 2025-06-01 12:30:00Z"));
    }

    #[test]
    fn test_generate_fails_on_missing_columns() {
        let config = SiteMapConfig::default();
        let t = Table {
            headers: vec!["Name".to_string()],
            records: vec![],
        };
        let err = generate(&config, &t, fixed_now()).unwrap_err();
        assert!(matches!(err, SiteMapError::MissingColumns { .. }), "got {:?}", err);
    }

    #[test]
    fn test_generate_rejects_invalid_config() {
        let config = SiteMapConfig {
            refresh_seconds: 0,
            ..SiteMapConfig::default()
        };
        let err = generate(&config, &table(vec![]), fixed_now()).unwrap_err();
        assert!(matches!(err, SiteMapError::Config(_)), "got {:?}", err);
    }

    #[test]
    fn test_completion_message() {
        let config = SiteMapConfig::default();
        let docs = generate(
            &config,
            &table(vec![row(2, "", "", "", "")]),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(
            completion_message(&config, &docs.summary),
            "Wrote sites.kml and networklink.kml. Skipped 1 rows missing required fields."
        );
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let config = SiteMapConfig::default();
        let docs = generate(
            &config,
            &table(vec![row(2, "A", "1", "2", "Suggested")]),
            fixed_now(),
        )
        .unwrap();
        let json = serde_json::to_value(&docs.summary).unwrap();
        assert_eq!(json["placemarks_written"], 1);
        assert_eq!(json["placemarks_by_class"]["Suggested"], 1);
    }
}
