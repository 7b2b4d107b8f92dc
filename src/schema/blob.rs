//! Decoding of the form data blob embedded in the page
//!
//! The page assigns a nested JSON array to `FB_PUBLIC_LOAD_DATA_`. Element
//! `[1][1]` is the list of question descriptors:
//!
//! ```text
//! [ _, text, _, type_code, [ [entry_id, [[option, ...], ...], required, ...], ... ], ... ]
//! ```
//!
//! Every index is checked here so a layout change surfaces as a
//! `ParseError::Shape` naming the offending path.

use crate::ParseError;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Minimum length of a usable question descriptor
const MIN_DESCRIPTOR_LEN: usize = 5;

fn blob_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // Terminated by the end of the script block or more markup
            Regex::new(r"(?s)var FB_PUBLIC_LOAD_DATA_ = (\[.+?\]);\s*<").expect("static regex"),
            Regex::new(r"(?s)var FB_PUBLIC_LOAD_DATA_ = (\[.+?\]);").expect("static regex"),
        ]
    })
}

/// A question descriptor with its shape already validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawQuestion {
    pub text: String,
    pub type_code: Option<i64>,
    pub details: Vec<RawDetail>,
}

/// One answerable entry of a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDetail {
    pub entry_id: String,
    pub options: Vec<String>,
    pub required: bool,
}

/// Finds the text of the embedded JSON array in the page
pub fn locate_blob(html: &str) -> Result<&str, ParseError> {
    blob_patterns()
        .iter()
        .find_map(|pattern| pattern.captures(html))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .ok_or(ParseError::BlobNotFound)
}

/// Decodes the blob text into validated question descriptors
///
/// Descriptors that are not arrays, are shorter than five elements or carry
/// no detail records are skipped. Any other mismatch is an error.
pub fn decode_blob(json: &str) -> Result<Vec<RawQuestion>, ParseError> {
    let root: Value = serde_json::from_str(json)?;

    let form = index(&root, 1, "[1]")?;
    let descriptors = match index(form, 1, "[1][1]")? {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        _ => return Err(shape("[1][1]", "an array of question descriptors")),
    };

    let mut questions = Vec::with_capacity(descriptors.len());
    for (i, descriptor) in descriptors.iter().enumerate() {
        let path = format!("[1][1][{}]", i);
        if let Some(question) = decode_descriptor(descriptor, &path)? {
            questions.push(question);
        }
    }

    Ok(questions)
}

fn decode_descriptor(descriptor: &Value, path: &str) -> Result<Option<RawQuestion>, ParseError> {
    let Some(fields) = descriptor.as_array() else {
        tracing::debug!("Skipping non-array question descriptor at {}", path);
        return Ok(None);
    };
    if fields.len() < MIN_DESCRIPTOR_LEN {
        tracing::debug!("Skipping short question descriptor at {}", path);
        return Ok(None);
    }

    let details = match &fields[4] {
        Value::Null => return Ok(None),
        Value::Array(items) if items.is_empty() => return Ok(None),
        Value::Array(items) => items,
        _ => return Err(shape(&format!("{}[4]", path), "an array of entry details")),
    };

    let text = match &fields[1] {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        _ => return Err(shape(&format!("{}[1]", path), "question text")),
    };

    let type_code = match &fields[3] {
        Value::Null => None,
        Value::Number(n) => match n.as_i64() {
            Some(code) => Some(code),
            None => return Err(shape(&format!("{}[3]", path), "an integer type code")),
        },
        _ => return Err(shape(&format!("{}[3]", path), "an integer type code")),
    };

    let details = details
        .iter()
        .enumerate()
        .map(|(j, detail)| decode_detail(detail, &format!("{}[4][{}]", path, j)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(RawQuestion {
        text,
        type_code,
        details,
    }))
}

fn decode_detail(detail: &Value, path: &str) -> Result<RawDetail, ParseError> {
    let fields = detail
        .as_array()
        .filter(|fields| fields.len() >= 2)
        .ok_or_else(|| shape(path, "an entry detail with id and options"))?;

    let entry_id = match &fields[0] {
        Value::Number(n) => n.to_string(),
        Value::String(s) if !s.is_empty() => s.clone(),
        _ => return Err(shape(&format!("{}[0]", path), "an entry id")),
    };

    let options = match &fields[1] {
        Value::Null => Vec::new(),
        Value::Array(records) => records.iter().filter_map(option_label).collect(),
        _ => return Err(shape(&format!("{}[1]", path), "an array of option records")),
    };

    let required = match fields.get(2) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().map_or(true, |v| v != 0),
        _ => true,
    };

    Ok(RawDetail {
        entry_id,
        options,
        required,
    })
}

/// First element of an option record, if it is a non-empty label
fn option_label(record: &Value) -> Option<String> {
    match record.as_array()?.first()? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn index<'a>(value: &'a Value, i: usize, path: &str) -> Result<&'a Value, ParseError> {
    value
        .as_array()
        .and_then(|items| items.get(i))
        .ok_or_else(|| shape(path, "an array element"))
}

fn shape(path: &str, expected: &'static str) -> ParseError {
    ParseError::Shape {
        path: path.to_string(),
        expected,
    }
}
