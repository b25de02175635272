// Terminal display of saved reports.
//
// Reports are read back without knowing their kind up front; the shape of
// the JSON decides which display applies.

pub mod terminal;

use std::path::Path;

use serde_json::Value;

use crate::error::Result;
use crate::ngrams::table::{FrequencyTable, TfidfScoreTable};
use crate::report::{read_json, TopicReport};
use crate::sentiment::summary::SentimentSummary;

/// A report read back from disk, with its kind detected from its content.
#[derive(Debug, Clone, PartialEq)]
pub enum SavedReport {
    Sentiment(TopicReport<SentimentSummary>),
    Frequency(TopicReport<FrequencyTable>),
    Tfidf(TopicReport<TfidfScoreTable>),
}

impl SavedReport {
    /// Load any of the three report shapes.
    ///
    /// Sentiment is tried first because an n-gram table tolerates missing
    /// arity keys; integer-valued tables are frequency reports.
    pub fn load(path: &Path) -> Result<Self> {
        let value: Value = read_json(path)?;
        if let Ok(report) = serde_json::from_value(value.clone()) {
            return Ok(SavedReport::Sentiment(report));
        }
        if let Ok(report) = serde_json::from_value(value.clone()) {
            return Ok(SavedReport::Frequency(report));
        }
        Ok(SavedReport::Tfidf(serde_json::from_value(value)?))
    }
}

/// Shorten to `max_chars` characters (not bytes), marking the cut with "...".
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
