//! Submission payload and per-question field encoding

use crate::answers::AnswerValue;
use crate::schema::{Question, QuestionKind};
use std::collections::BTreeMap;

/// URL-encoded form body for one submission
///
/// Field names may repeat: a checkbox answer contributes one field per
/// selected option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPayload {
    fields: Vec<(String, String)>,
}

impl SubmissionPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// All fields in submission order
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `name`, in order
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Adds the schema's hidden fields ahead of the answers
    ///
    /// An answer field with the same name as a hidden field wins.
    pub fn merge_hidden(&mut self, hidden: &BTreeMap<String, String>) {
        let mut merged: Vec<(String, String)> = hidden
            .iter()
            .filter(|(name, _)| !self.contains(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        merged.append(&mut self.fields);
        self.fields = merged;
    }
}

/// Appends the wire fields for one answered question
///
/// # Encoding Rules
///
/// | Kind | Value | Fields |
/// |------|-------|--------|
/// | Date | `YYYY-MM-DD` | `<id>_year`, `<id>_month`, `<id>_day` |
/// | Time | `HH:MM` | `<id>_hour`, `<id>_minute` |
/// | any | multiple values | `<id>` once per value |
/// | any | anything else | `<id>` |
///
/// A date or time that does not split into the expected parts is sent
/// unsplit under `<id>`.
pub fn encode_answer(payload: &mut SubmissionPayload, question: &Question, answer: &AnswerValue) {
    let id = question.id.as_str();

    let value = match answer {
        AnswerValue::Multiple(values) => {
            for value in values {
                payload.push(id, value.as_str());
            }
            return;
        }
        AnswerValue::Single(value) => value.as_str(),
    };

    match question.kind {
        QuestionKind::Date if !value.is_empty() => {
            let parts: Vec<&str> = value.split('-').collect();
            if let [year, month, day] = parts.as_slice() {
                payload.push(format!("{}_year", id), *year);
                payload.push(format!("{}_month", id), *month);
                payload.push(format!("{}_day", id), *day);
            } else {
                tracing::debug!("Date answer '{}' for {} not in YYYY-MM-DD form", value, id);
                payload.push(id, value);
            }
        }
        QuestionKind::Time if !value.is_empty() => {
            let parts: Vec<&str> = value.split(':').collect();
            if let [hour, minute] = parts.as_slice() {
                payload.push(format!("{}_hour", id), *hour);
                payload.push(format!("{}_minute", id), *minute);
            } else {
                tracing::debug!("Time answer '{}' for {} not in HH:MM form", value, id);
                payload.push(id, value);
            }
        }
        _ => payload.push(id, value),
    }
}
