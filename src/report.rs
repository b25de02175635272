// Per-topic analysis reports and their JSON persistence.
//
// Every analysis produces one value per topic plus one "All" aggregate,
// saved as a flat JSON object keyed by topic name. Key order is part of
// the output contract: topics in input order, "All" last.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::ALL_TOPICS;
use crate::error::{AnalysisError, Result};

/// Ordered topic → result mapping with the aggregate stored under "All".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicReport<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for TopicReport<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> TopicReport<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, topic: impl Into<String>, value: T) {
        self.entries.insert(topic.into(), value);
    }

    pub fn get(&self, topic: &str) -> Option<&T> {
        self.entries.get(topic)
    }

    /// The cross-topic aggregate, if it has been recorded.
    pub fn all(&self) -> Option<&T> {
        self.entries.get(ALL_TOPICS)
    }

    /// Entries in insertion order, "All" included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Serialize> TopicReport<T> {
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(self, path)
    }
}

impl<T: DeserializeOwned> TopicReport<T> {
    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Serialize to pretty JSON and write, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| AnalysisError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Saved report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_keeps_insertion_order() {
        let mut report = TopicReport::new();
        report.insert("zeta", 1);
        report.insert("alpha", 2);
        report.insert(ALL_TOPICS, 3);

        let keys: Vec<&str> = report.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "All"]);
        assert_eq!(report.all(), Some(&3));

        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":2,"All":3}"#);
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let err = read_json::<serde_json::Value>(Path::new("/nonexistent/genlex/report.json"))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Io { .. }));
    }
}
