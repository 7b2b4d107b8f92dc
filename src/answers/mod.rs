//! Caller-supplied answers that take precedence over synthesis
//!
//! # Components
//!
//! - `AnswerValue`: a single answer or an ordered list (checkbox questions)
//! - `OverrideMap`: question id → answer, keys absent mean "synthesize"
//! - `handoff`: one-shot channel the configurator resolves for the dispatcher

pub mod handoff;

use crate::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub use handoff::{override_handoff, OverrideReceiver, OverrideSender};

/// Value a configurator uses to mean "generate this field randomly"
pub const RANDOM_SENTINEL: &str = "__RANDOM__";

/// A fixed answer for one question
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// One value, used for every non-checkbox question
    Single(String),

    /// Ordered values; each becomes its own field in the payload
    Multiple(Vec<String>),
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

/// Question id → fixed answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct OverrideMap(HashMap<String, AnswerValue>);

impl OverrideMap {
    /// Creates an empty override map
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the answer for a question id, replacing any previous one
    pub fn insert(&mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) {
        self.0.insert(question_id.into(), value.into());
    }

    /// Looks up the answer for a question id
    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.0.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merges `other` into this map; entries in `other` win
    pub fn extend(&mut self, other: OverrideMap) {
        self.0.extend(other.0);
    }

    /// Drops entries that only carry the random sentinel
    ///
    /// A `Single` sentinel is removed outright. Sentinel entries inside a
    /// `Multiple` are filtered and the key is removed if nothing remains.
    pub fn without_random_sentinels(self) -> Self {
        let entries = self
            .0
            .into_iter()
            .filter_map(|(id, value)| match value {
                AnswerValue::Single(v) if v == RANDOM_SENTINEL => None,
                AnswerValue::Multiple(values) => {
                    let kept: Vec<String> =
                        values.into_iter().filter(|v| v != RANDOM_SENTINEL).collect();
                    if kept.is_empty() {
                        None
                    } else {
                        Some((id, AnswerValue::Multiple(kept)))
                    }
                }
                other => Some((id, other)),
            })
            .collect();
        Self(entries)
    }
}

impl FromIterator<(String, AnswerValue)> for OverrideMap {
    fn from_iter<T: IntoIterator<Item = (String, AnswerValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Loads an override file
///
/// The file is a flat TOML table keyed by question id:
///
/// ```toml
/// "entry.123" = "Left"
/// "entry.456" = ["A", "B"]
/// "entry.789" = "__RANDOM__"
/// ```
///
/// Random sentinels are stripped before the map is returned.
pub fn load_overrides(path: &Path) -> Result<OverrideMap, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let overrides: OverrideMap = toml::from_str(&content)?;
    Ok(overrides.without_random_sentinels())
}
