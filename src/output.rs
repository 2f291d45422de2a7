//! Output sinks for finished documents.

use crate::model::SiteMapError;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Accepts a finished text document under a filename.
pub trait OutputSink {
    /// Stores `document` as `filename` and returns where it went, for
    /// reporting.
    fn write_document(&mut self, filename: &str, document: &str) -> Result<String, SiteMapError>;
}

/// Writes documents as UTF-8 files into a directory, creating it if needed.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl OutputSink for DirectorySink {
    fn write_document(&mut self, filename: &str, document: &str) -> Result<String, SiteMapError> {
        fs::create_dir_all(&self.dir).map_err(|e| SiteMapError::io(self.dir.display(), e))?;

        let path = self.dir.join(filename);
        // sibling temp file, renamed into place
        let tmp = self.dir.join(format!(".{}.tmp", filename));
        fs::write(&tmp, document).map_err(|e| SiteMapError::io(tmp.display(), e))?;
        fs::rename(&tmp, &path).map_err(|e| SiteMapError::io(path.display(), e))?;

        Ok(path.display().to_string())
    }
}

/// Keeps documents in memory; used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub documents: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn get(&self, filename: &str) -> Option<&str> {
        self.documents.get(filename).map(String::as_str)
    }
}

impl OutputSink for MemorySink {
    fn write_document(&mut self, filename: &str, document: &str) -> Result<String, SiteMapError> {
        self.documents
            .insert(filename.to_string(), document.to_string());
        Ok(format!("memory:{}", filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_creates_dir_and_writes_file() {
        let root = tempfile::tempdir().unwrap();
        let out_dir = root.path().join("public");
        let mut sink = DirectorySink::new(&out_dir);

        let location = sink.write_document("sites.kml", "<kml/>\n").unwrap();

        let path = out_dir.join("sites.kml");
        assert_eq!(location, path.display().to_string());
        assert_eq!(fs::read_to_string(&path).unwrap(), "<kml/>\n");
        assert!(!out_dir.join(".sites.kml.tmp").exists(), "temp file should be renamed away");
    }

    #[test]
    fn test_directory_sink_overwrites_existing_file() {
        let root = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(root.path());
        sink.write_document("networklink.kml", "old").unwrap();
        sink.write_document("networklink.kml", "new").unwrap();
        assert_eq!(
            fs::read_to_string(root.path().join("networklink.kml")).unwrap(),
            "new"
        );
    }

    #[test]
    fn test_memory_sink_keeps_documents() {
        let mut sink = MemorySink::default();
        sink.write_document("a.kml", "A").unwrap();
        assert_eq!(sink.get("a.kml"), Some("A"));
        assert_eq!(sink.get("b.kml"), None);
    }
}
