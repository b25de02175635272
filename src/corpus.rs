// TopicCorpus: the validated input record for an analysis run.
//
// The on-disk document is a nested JSON mapping:
//   { "<topic>": { "sampling": ["...", ...], "greedy": [...] }, ... }
//
// It is validated once at load time into an ordered list of topics, each
// holding its samples per generation mode. Topic order follows the
// document so reports come out in the same order they went in.

use std::path::Path;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::report;

/// Generation mode consumed by the analysis routines.
pub const SAMPLING_MODE: &str = "sampling";

/// Key under which every report stores the cross-topic aggregate.
pub const ALL_TOPICS: &str = "All";

/// Samples generated for one topic, grouped by generation mode.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicSamples {
    pub name: String,
    pub modes: IndexMap<String, Vec<String>>,
}

impl TopicSamples {
    /// A topic with only a "sampling" list.
    pub fn with_sampling(name: impl Into<String>, samples: Vec<String>) -> Self {
        let mut modes = IndexMap::new();
        modes.insert(SAMPLING_MODE.to_string(), samples);
        Self {
            name: name.into(),
            modes,
        }
    }

    /// Samples for the given mode, or MalformedInput if the topic lacks it.
    pub fn samples(&self, mode: &str) -> Result<&[String]> {
        self.modes
            .get(mode)
            .map(Vec::as_slice)
            .ok_or_else(|| AnalysisError::malformed(&self.name, format!("missing {mode:?} list")))
    }

    /// Shorthand for `samples(SAMPLING_MODE)`.
    pub fn sampling(&self) -> Result<&[String]> {
        self.samples(SAMPLING_MODE)
    }
}

/// All topics of one analysis run, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopicCorpus {
    topics: Vec<TopicSamples>,
}

impl TopicCorpus {
    /// Build a corpus from already-structured topics.
    ///
    /// Rejects duplicate topic names and the reserved aggregate name "All".
    pub fn new(topics: Vec<TopicSamples>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for topic in &topics {
            if topic.name == ALL_TOPICS {
                return Err(AnalysisError::malformed(
                    &topic.name,
                    "topic name is reserved for the cross-topic aggregate",
                ));
            }
            if !seen.insert(topic.name.as_str()) {
                return Err(AnalysisError::malformed(&topic.name, "duplicate topic"));
            }
        }
        Ok(Self { topics })
    }

    /// Validate a parsed JSON document.
    pub fn from_value(value: &Value) -> Result<Self> {
        let root = value
            .as_object()
            .ok_or_else(|| AnalysisError::malformed("", "document root must be an object"))?;

        let mut topics = Vec::with_capacity(root.len());
        for (name, entry) in root {
            topics.push(parse_topic(name, entry)?);
        }
        Self::new(topics)
    }

    /// Render back into the nested JSON document shape.
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        for topic in &self.topics {
            let mut modes = Map::new();
            for (mode, samples) in &topic.modes {
                modes.insert(
                    mode.clone(),
                    Value::Array(samples.iter().cloned().map(Value::String).collect()),
                );
            }
            root.insert(topic.name.clone(), Value::Object(modes));
        }
        Value::Object(root)
    }

    pub fn topics(&self) -> &[TopicSamples] {
        &self.topics
    }

    /// Every topic's samples for `mode`, concatenated in topic order.
    pub fn all_samples(&self, mode: &str) -> Result<Vec<String>> {
        let mut all = Vec::new();
        for topic in &self.topics {
            all.extend_from_slice(topic.samples(mode)?);
        }
        Ok(all)
    }
}

fn parse_topic(name: &str, entry: &Value) -> Result<TopicSamples> {
    let modes_obj = entry
        .as_object()
        .ok_or_else(|| AnalysisError::malformed(name, "topic entry must be an object of modes"))?;

    let mut modes = IndexMap::with_capacity(modes_obj.len());
    for (mode, list) in modes_obj {
        let items = list.as_array().ok_or_else(|| {
            AnalysisError::malformed(name, format!("mode {mode:?} must be a list of strings"))
        })?;

        let mut samples = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => samples.push(s.clone()),
                other => {
                    return Err(AnalysisError::malformed(
                        name,
                        format!("{mode}[{i}] is not a string: {other}"),
                    ))
                }
            }
        }
        modes.insert(mode.clone(), samples);
    }

    Ok(TopicSamples {
        name: name.to_string(),
        modes,
    })
}

/// Load and validate a generated-text document from disk.
pub fn load_corpus(path: &Path) -> Result<TopicCorpus> {
    let value: Value = report::read_json(path)?;
    let corpus = TopicCorpus::from_value(&value)?;
    debug!(path = %path.display(), topics = corpus.topics.len(), "Loaded corpus");
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_preserves_topic_order() {
        let doc = json!({
            "zebras": {"sampling": ["a"], "greedy": ["b"]},
            "apples": {"sampling": []},
        });
        let corpus = TopicCorpus::from_value(&doc).unwrap();
        let names: Vec<&str> = corpus.topics().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["zebras", "apples"]);
        assert_eq!(corpus.topics()[0].modes["greedy"], vec!["b".to_string()]);
    }

    #[test]
    fn test_missing_sampling_is_malformed() {
        let doc = json!({"cats": {"greedy": ["x"]}});
        let corpus = TopicCorpus::from_value(&doc).unwrap();
        let err = corpus.topics()[0].sampling().unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedInput { ref topic, .. } if topic == "cats"));
    }

    #[test]
    fn test_non_string_sample_rejected() {
        let doc = json!({"cats": {"sampling": ["ok", 3]}});
        let err = TopicCorpus::from_value(&doc).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedInput { .. }));
    }

    #[test]
    fn test_non_object_root_rejected() {
        assert!(TopicCorpus::from_value(&json!(["cats"])).is_err());
        assert!(TopicCorpus::from_value(&json!({"cats": ["x"]})).is_err());
    }

    #[test]
    fn test_reserved_all_topic_rejected() {
        let doc = json!({"All": {"sampling": []}});
        assert!(TopicCorpus::from_value(&doc).is_err());
    }

    #[test]
    fn test_to_value_round_trip() {
        let doc = json!({"cats": {"sampling": ["x", "y"], "greedy": []}});
        let corpus = TopicCorpus::from_value(&doc).unwrap();
        assert_eq!(corpus.to_value(), doc);
    }

    #[test]
    fn test_all_samples_concatenates_in_order() {
        let corpus = TopicCorpus::new(vec![
            TopicSamples::with_sampling("a", vec!["1".into(), "2".into()]),
            TopicSamples::with_sampling("b", vec!["3".into()]),
        ])
        .unwrap();
        assert_eq!(
            corpus.all_samples(SAMPLING_MODE).unwrap(),
            vec!["1".to_string(), "2".to_string(), "3".to_string()]
        );
    }
}
