//! KML rendering.
//!
//! Submodules:
//! - `placemark` — description panel and per-site placemark markup.
//! - `kml` — the dataset document and the network-link document.
//!
//! This module holds the pieces both share: escaping, timestamp format and
//! an indenting element writer.

pub mod kml;
pub mod placemark;

use chrono::{DateTime, Utc};

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Format used for every "Updated (UTC)" stamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%SZ";

pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Escapes text for XML element content and attribute values, quotes
/// included.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps `text` in a CDATA section. A literal `]]>` inside the text is
/// split across two sections.
pub fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Line-oriented XML writer, two spaces of indent per open element.
#[derive(Debug, Default)]
pub struct KmlWriter {
    buf: String,
    depth: usize,
}

impl KmlWriter {
    /// A writer that has already emitted the XML declaration.
    pub fn document() -> Self {
        let mut writer = KmlWriter::default();
        writer.line(XML_DECLARATION);
        writer
    }

    /// Writes one pre-formatted line at the current depth.
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.buf.push_str("  ");
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    pub fn open(&mut self, tag: &str) {
        self.line(&format!("<{}>", tag));
        self.depth += 1;
    }

    /// Opens an element with attributes; values are escaped.
    pub fn open_with(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        let rendered: String = attrs
            .iter()
            .map(|(k, v)| format!(" {}=\"{}\"", k, escape_xml(v)))
            .collect();
        self.line(&format!("<{}{}>", tag, rendered));
        self.depth += 1;
    }

    pub fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(&format!("</{}>", tag));
    }

    /// `<tag>text</tag>` with `text` escaped.
    pub fn element(&mut self, tag: &str, text: &str) {
        self.line(&format!("<{}>{}</{}>", tag, escape_xml(text), tag));
    }

    /// `<tag><![CDATA[html]]></tag>`; `html` is written verbatim.
    pub fn cdata_element(&mut self, tag: &str, html: &str) {
        self.line(&format!("<{}>{}</{}>", tag, cdata(html), tag));
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
