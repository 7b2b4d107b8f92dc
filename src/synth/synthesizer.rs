//! Answer synthesis for a whole form

use super::payload::{encode_answer, SubmissionPayload};
use super::text::{FakeText, TextGenerator};
use crate::answers::{AnswerValue, OverrideMap};
use crate::schema::{FormSchema, Question, QuestionKind};
use chrono::{Duration, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Look-back window for date questions
const RECENT_DATE_DAYS: i64 = 365;

/// Look-back window for dates asked for in free-text questions
const TEXT_DATE_DAYS: i64 = 365 * 30;

/// Range of synthesized ages (inclusive)
const AGE_RANGE: std::ops::RangeInclusive<u32> = 18..=99;

/// Builds one answer payload per call
///
/// Owns its random source; give each worker its own synthesizer.
#[derive(Debug)]
pub struct Synthesizer {
    rng: StdRng,
    text: Arc<dyn TextGenerator>,
    today: NaiveDate,
}

impl Synthesizer {
    /// Creates a synthesizer from an explicit random source and text generator
    pub fn new(rng: StdRng, text: Arc<dyn TextGenerator>) -> Self {
        Self {
            rng,
            text,
            today: Local::now().date_naive(),
        }
    }

    /// Reproducible synthesizer using `FakeText`
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed), Arc::new(FakeText))
    }

    /// Synthesizer seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy(), Arc::new(FakeText))
    }

    /// Fixes the date that generated dates count back from
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Produces a complete payload for `schema`
    ///
    /// Questions are answered in schema order. An override always wins;
    /// otherwise the answer is generated from the question kind, with
    /// `default_text` taking the place of generated text when given.
    /// Hidden fields are not included; see `SubmissionPayload::merge_hidden`.
    pub fn synthesize(
        &mut self,
        schema: &FormSchema,
        overrides: Option<&OverrideMap>,
        default_text: Option<&str>,
    ) -> SubmissionPayload {
        let mut payload = SubmissionPayload::new();

        for question in &schema.questions {
            let answer = match overrides.and_then(|o| o.get(&question.id)) {
                Some(fixed) => fixed.clone(),
                None => self.generate(question, default_text),
            };
            encode_answer(&mut payload, question, &answer);
        }

        payload
    }

    fn generate(&mut self, question: &Question, default_text: Option<&str>) -> AnswerValue {
        match question.kind {
            kind if kind.is_single_choice() => {
                AnswerValue::Single(question.options.choose(&mut self.rng).cloned().unwrap_or_default())
            }
            QuestionKind::MultiChoice => self.pick_subset(&question.options),
            QuestionKind::Date => AnswerValue::Single(self.date_within(RECENT_DATE_DAYS)),
            QuestionKind::Time => AnswerValue::Single(self.time_of_day()),
            _ => AnswerValue::Single(match default_text {
                Some(text) => text.to_string(),
                None => self.text_for(question),
            }),
        }
    }

    /// Non-empty subset: size uniform in `1..=len`, members drawn without replacement
    fn pick_subset(&mut self, options: &[String]) -> AnswerValue {
        if options.is_empty() {
            return AnswerValue::Single(String::new());
        }

        let k = self.rng.gen_range(1..=options.len());
        let picked = options
            .choose_multiple(&mut self.rng, k)
            .cloned()
            .collect();
        AnswerValue::Multiple(picked)
    }

    /// Picks text by keywords in the question
    fn text_for(&mut self, question: &Question) -> String {
        let text = question.text.to_lowercase();

        if text.contains("email") {
            self.text.email(&mut self.rng)
        } else if text.contains("name") {
            self.text.full_name(&mut self.rng)
        } else if text.contains("phone") || text.contains("number") {
            self.text.phone_number(&mut self.rng)
        } else if text.contains("age") {
            self.rng.gen_range(AGE_RANGE).to_string()
        } else if text.contains("time") {
            self.time_of_day()
        } else if text.contains("date") {
            self.date_within(TEXT_DATE_DAYS)
        } else if question.kind == QuestionKind::Paragraph {
            self.text.paragraph(&mut self.rng)
        } else {
            self.text.sentence(&mut self.rng)
        }
    }

    /// `YYYY-MM-DD`, between `days` ago and today
    fn date_within(&mut self, days: i64) -> String {
        let offset = self.rng.gen_range(0..=days);
        (self.today - Duration::days(offset))
            .format("%Y-%m-%d")
            .to_string()
    }

    /// `HH:MM`
    fn time_of_day(&mut self) -> String {
        let hour: u32 = self.rng.gen_range(0..24);
        let minute: u32 = self.rng.gen_range(0..60);
        format!("{:02}:{:02}", hour, minute)
    }
}
