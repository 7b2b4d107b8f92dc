//! Answer synthesis
//!
//! Turns a `FormSchema` plus optional overrides into one `SubmissionPayload`
//! per call. Randomness comes from an injected `StdRng`, text from an
//! injected `TextGenerator`, so a fixed seed yields identical payloads.

mod payload;
mod synthesizer;
mod text;

pub use payload::{encode_answer, SubmissionPayload};
pub use synthesizer::Synthesizer;
pub use text::{FakeText, TextGenerator};
