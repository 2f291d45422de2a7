//! Per-site markup: the HTML description panel, the placemark itself and
//! the shared icon styles.

use super::{escape_xml, KmlWriter};
use crate::config::SiteMapConfig;
use crate::model::{DisplayValue, FieldKind, SiteEntry};
use crate::styles::StyleRule;

/// Separator between description lines.
const BREAK: &str = "<br/>";

/// Builds the description panel HTML for one site.
///
/// Every value is escaped; the result is meant to be wrapped in CDATA.
/// `updated` is the preformatted generation timestamp.
pub fn describe(config: &SiteMapConfig, entry: &SiteEntry, updated: &str) -> String {
    let mut parts = Vec::with_capacity(entry.details.len() + 4);
    parts.push(format!("<b>Name:</b> {}", escape_xml(&entry.name)));
    parts.push(format!(
        "<b>{}:</b> {}",
        escape_xml(&config.class_label),
        escape_xml(&entry.class_value)
    ));

    parts.extend(entry.details.iter().map(detail_line));

    parts.push(format!("<i>Updated (UTC):</i> {}", updated));
    parts.push(format!(
        "<i>Refresh:</i> every {} minutes",
        config.refresh_minutes()
    ));

    parts.join(BREAK)
}

fn detail_line(detail: &DisplayValue) -> String {
    let label = escape_xml(&detail.label);
    let value = escape_xml(&detail.value);
    match detail.kind {
        FieldKind::Link if is_web_link(&detail.value) => format!(
            r#"<b>{}:</b> <a href="{}" target="_blank">{}</a>"#,
            label, value, value
        ),
        _ => format!("<b>{}:</b> {}", label, value),
    }
}

/// Only http(s) values become anchors; anything else renders as text.
fn is_web_link(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// `lon,lat`, the KML coordinate order.
pub fn coordinates_text(entry: &SiteEntry) -> String {
    format!(
        "{},{}",
        entry.coordinates.longitude(),
        entry.coordinates.latitude()
    )
}

/// Writes one `<Placemark>`. Unstyled sites get no `styleUrl`.
pub fn write_placemark(
    w: &mut KmlWriter,
    entry: &SiteEntry,
    style_id: Option<&str>,
    description: &str,
) {
    w.open("Placemark");
    w.element("name", &entry.name);
    if let Some(id) = style_id {
        w.element("styleUrl", &format!("#{}", id));
    }
    w.cdata_element("description", description);
    w.open("Point");
    w.element("coordinates", &coordinates_text(entry));
    w.close("Point");
    w.close("Placemark");
}

/// Writes one shared `<Style>` block for a classification value.
pub fn write_style(w: &mut KmlWriter, config: &SiteMapConfig, rule: &StyleRule) {
    w.open_with("Style", &[("id", rule.value.as_str())]);
    w.open("IconStyle");
    w.element("color", &rule.color.to_ascii_lowercase());
    w.element("scale", &config.icon_scale.to_string());
    w.open("Icon");
    w.element("href", rule.icon_or(&config.default_icon));
    w.close("Icon");
    w.close("IconStyle");
    w.open("LabelStyle");
    w.element("scale", &config.label_scale.to_string());
    w.close("LabelStyle");
    w.close("Style");
}
