//! Schema extraction from public form pages
//!
//! This module contains:
//! - URL canonicalization and submission endpoint derivation
//! - Typed decoding of the embedded form data blob
//! - Hidden input collection
//! - The fetching extractor that assembles a `FormSchema`

mod blob;
mod extractor;
mod form_url;
mod hidden;
mod types;

pub use blob::{decode_blob, locate_blob, RawDetail, RawQuestion};
pub use extractor::{parse_form_page, SchemaExtractor};
pub use form_url::{canonical_form_url, submission_url};
pub use hidden::extract_hidden_fields;
pub use types::{FormSchema, Question, QuestionKind};

use crate::ExtractError;
use reqwest::Client;

/// Fetches a form page and extracts its schema
///
/// Nothing is submitted; a failure here means no schema at all.
///
/// # Example
///
/// ```no_run
/// use formcast::schema::extract;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = reqwest::Client::new();
/// let schema = extract(&client, "https://docs.google.com/forms/d/e/abc/viewform").await?;
/// for question in &schema.questions {
///     println!("{} [{}] {}", question.id, question.kind, question.text);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn extract(client: &Client, url: &str) -> Result<FormSchema, ExtractError> {
    SchemaExtractor::new(client.clone()).extract(url).await
}
