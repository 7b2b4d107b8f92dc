//! Form schema definitions
//!
//! A `FormSchema` is built once per run by the extractor and then shared
//! read-only by every worker.

use std::collections::BTreeMap;
use std::fmt;

/// The kind of answer a question accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    // ===== Text =====
    /// Single-line text
    FreeText,

    /// Multi-line text
    Paragraph,

    // ===== Single choice =====
    /// Radio buttons
    SingleChoice,

    /// Drop-down list
    Dropdown,

    /// Linear scale
    Scale,

    /// Multiple choice grid row
    Grid,

    // ===== Multiple choice =====
    /// Checkboxes; any non-empty subset of the options
    MultiChoice,

    // ===== Split fields =====
    /// Calendar date, submitted as year/month/day sub-fields
    Date,

    /// Time of day, submitted as hour/minute sub-fields
    Time,

    /// Unrecognized type code without options; answered like free text
    Unknown,
}

impl QuestionKind {
    /// Maps the numeric type code of a question descriptor
    ///
    /// Codes outside the known table map to `Unknown`; the caller applies the
    /// options fallback.
    pub fn from_type_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => Self::FreeText,
            Some(1) => Self::Paragraph,
            Some(2) => Self::SingleChoice,
            Some(3) => Self::Dropdown,
            Some(4) => Self::MultiChoice,
            Some(5) => Self::Scale,
            Some(7) => Self::Grid,
            Some(9) => Self::Date,
            Some(10) => Self::Time,
            _ => Self::Unknown,
        }
    }

    /// Resolves the final kind for a descriptor
    ///
    /// An unmapped code that still carries options is treated as single choice.
    pub fn classify(code: Option<i64>, has_options: bool) -> Self {
        match Self::from_type_code(code) {
            Self::Unknown if has_options => Self::SingleChoice,
            kind => kind,
        }
    }

    /// Returns true if exactly one option is picked for this kind
    pub fn is_single_choice(&self) -> bool {
        matches!(
            self,
            Self::SingleChoice | Self::Dropdown | Self::Scale | Self::Grid
        )
    }

    /// Returns true if the answer is generated text
    pub fn is_text(&self) -> bool {
        matches!(self, Self::FreeText | Self::Paragraph | Self::Unknown)
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::FreeText => "Short Answer",
            Self::Paragraph => "Paragraph",
            Self::SingleChoice => "Multiple Choice",
            Self::Dropdown => "Dropdown",
            Self::Scale => "Linear Scale",
            Self::Grid => "Multiple Choice Grid",
            Self::MultiChoice => "Checkboxes",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Unknown => "Open Ended",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One answerable field of the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Field name the submission endpoint expects, `entry.<n>`
    pub id: String,

    /// Display text
    pub text: String,

    pub kind: QuestionKind,

    /// Option labels in form order; empty for text kinds
    pub options: Vec<String>,

    pub required: bool,
}

/// The decoded form: questions, hidden fields and where to submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    /// URL the schema was extracted from
    pub url: String,

    /// Endpoint that accepts submissions
    pub submission_url: String,

    /// Questions in form order, ids unique
    pub questions: Vec<Question>,

    /// Hidden inputs the endpoint requires verbatim
    pub hidden_fields: BTreeMap<String, String>,
}

impl FormSchema {
    /// Creates an empty schema
    pub fn new(url: impl Into<String>, submission_url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            submission_url: submission_url.into(),
            questions: Vec::new(),
            hidden_fields: BTreeMap::new(),
        }
    }

    /// Adds a question, replacing an earlier one with the same id in place
    pub fn insert_question(&mut self, question: Question) {
        match self.questions.iter_mut().find(|q| q.id == question.id) {
            Some(existing) => *existing = question,
            None => self.questions.push(question),
        }
    }

    /// Looks up a question by id
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
