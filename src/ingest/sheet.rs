/// Published spreadsheet CSV ingest
///
/// Retrieves the site inventory as CSV, either from a published sheet URL
/// (Google Sheets "publish to web" link with `output=csv`) or from a local
/// export, and parses it into a [`Table`] of named string fields.

use crate::model::{Record, SiteMapError, Table};
use csv::{ReaderBuilder, Trim};
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Row providers
// ============================================================================

/// Yields the rows of a sheet given a source identifier (URL or path).
pub trait RowSource {
    fn fetch_table(&self, source: &str) -> Result<Table, SiteMapError>;
}

/// True for identifiers the HTTP provider should handle.
pub fn is_remote(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Fetches the published CSV over HTTP(S).
pub struct HttpSheetSource {
    client: reqwest::blocking::Client,
}

impl HttpSheetSource {
    pub fn new() -> Result<Self, SiteMapError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, SiteMapError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SiteMapError::HttpClient)?;
        Ok(Self { client })
    }
}

impl RowSource for HttpSheetSource {
    fn fetch_table(&self, url: &str) -> Result<Table, SiteMapError> {
        let fetch_err = |source| SiteMapError::Fetch {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .header("Accept", "text/csv")
            .send()
            .map_err(fetch_err)?;

        if !response.status().is_success() {
            return Err(SiteMapError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().map_err(fetch_err)?;
        parse_csv(&String::from_utf8_lossy(&body))
    }
}

/// Reads a CSV export from disk.
pub struct FileSheetSource;

impl RowSource for FileSheetSource {
    fn fetch_table(&self, path: &str) -> Result<Table, SiteMapError> {
        let bytes = std::fs::read(Path::new(path)).map_err(|e| SiteMapError::io(path, e))?;
        parse_csv(&String::from_utf8_lossy(&bytes))
    }
}

/// Dispatches on the identifier: http(s) URLs go over the network,
/// everything else is treated as a file path.
pub struct AutoSource {
    http: HttpSheetSource,
}

impl AutoSource {
    pub fn new() -> Result<Self, SiteMapError> {
        Ok(Self {
            http: HttpSheetSource::new()?,
        })
    }
}

impl RowSource for AutoSource {
    fn fetch_table(&self, source: &str) -> Result<Table, SiteMapError> {
        if is_remote(source) {
            self.http.fetch_table(source.trim())
        } else {
            FileSheetSource.fetch_table(source)
        }
    }
}

// ============================================================================
// CSV parsing
// ============================================================================

/// Parse sheet CSV text into a table.
///
/// The first row is the header. Header names are trimmed; cell values are
/// kept as-is and trimmed by the validator. Rows shorter than the header
/// read the missing cells as empty, and extra cells beyond the header are
/// dropped.
pub fn parse_csv(text: &str) -> Result<Table, SiteMapError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    // Physical lines consumed by newlines inside quoted cells; subtracting
    // them maps a CSV line back to the sheet row.
    let mut embedded_newlines = count_newlines(headers.iter().map(String::as_str));

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        let line = match row.position() {
            Some(pos) => {
                let physical = pos.line() as usize + blank_lines_at(text, pos.byte() as usize);
                physical.saturating_sub(embedded_newlines)
            }
            // header is sheet line 1
            None => i + 2,
        };
        embedded_newlines += count_newlines(row.iter());

        let mut record = Record::new(line);
        for (idx, header) in headers.iter().enumerate() {
            record.insert(header, row.get(idx).unwrap_or(""));
        }
        records.push(record);
    }

    Ok(Table { headers, records })
}

/// Line breaks between `offset` and the first byte of the next record. The
/// reader records a position before it skips blank lines.
fn blank_lines_at(text: &str, offset: usize) -> usize {
    text.as_bytes()
        .get(offset..)
        .unwrap_or_default()
        .iter()
        .take_while(|b| matches!(b, b'\r' | b'\n'))
        .filter(|b| **b == b'\n')
        .count()
}

fn count_newlines<'a>(cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(|cell| cell.matches('\n').count()).sum()
}

// ============================================================================
// Tests
// ============================================================================
