//! The two output documents: the site dataset and the network link that
//! points clients at it.

use super::placemark::{describe, write_placemark, write_style};
use super::{KmlWriter, KML_NAMESPACE};
use crate::analysis::groupings::ClassGroup;
use crate::config::SiteMapConfig;
use crate::model::SiteEntry;

/// Renders the full dataset document.
///
/// Styles are emitted in configuration order. With `group_into_folders`
/// each classification group becomes a `<Folder>`; otherwise placemarks
/// are listed flat in sheet order.
pub fn render_dataset(
    config: &SiteMapConfig,
    groups: &[ClassGroup],
    updated: &str,
    rows_skipped: usize,
) -> String {
    let mut w = KmlWriter::document();
    w.open_with("kml", &[("xmlns", KML_NAMESPACE)]);
    w.open("Document");
    w.element("name", &config.dataset_name);
    w.cdata_element(
        "description",
        &format!(
            "Live dataset generated from Google Sheets.<br/>\
             Updated (UTC): {}<br/>\
             Rows skipped (missing/invalid required fields): {}",
            updated, rows_skipped
        ),
    );

    for rule in &config.styles {
        write_style(&mut w, config, rule);
    }

    if config.group_into_folders {
        for group in groups {
            w.open("Folder");
            w.element("name", &group.value);
            for entry in &group.entries {
                write_site(&mut w, config, entry, group.style_id.as_deref(), updated);
            }
            w.close("Folder");
        }
    } else {
        let mut flat: Vec<(&SiteEntry, Option<&str>)> = groups
            .iter()
            .flat_map(|g| g.entries.iter().map(move |e| (e, g.style_id.as_deref())))
            .collect();
        flat.sort_by_key(|(entry, _)| entry.line);
        for (entry, style_id) in flat {
            write_site(&mut w, config, entry, style_id, updated);
        }
    }

    w.close("Document");
    w.close("kml");
    w.finish()
}

fn write_site(
    w: &mut KmlWriter,
    config: &SiteMapConfig,
    entry: &SiteEntry,
    style_id: Option<&str>,
    updated: &str,
) {
    let description = describe(config, entry, updated);
    write_placemark(w, entry, style_id, &description);
}

/// Renders the network link document that makes clients re-fetch the
/// dataset every `refresh_seconds`.
pub fn render_network_link(config: &SiteMapConfig) -> String {
    let mut w = KmlWriter::document();
    w.open_with("kml", &[("xmlns", KML_NAMESPACE)]);
    w.open("NetworkLink");
    w.element("name", &config.dataset_name);
    w.open("Link");
    w.element("href", config.dataset_href());
    w.element("refreshMode", "onInterval");
    w.element("refreshInterval", &config.refresh_seconds.to_string());
    w.close("Link");
    w.close("NetworkLink");
    w.close("kml");
    w.finish()
}
