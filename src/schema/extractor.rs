//! Form page fetching and schema assembly
//!
//! Fetching and classification happen here; decoding is delegated to
//! `blob` (questions) and `hidden` (hidden inputs).

use super::blob::{decode_blob, locate_blob};
use super::hidden::extract_hidden_fields;
use super::types::{FormSchema, Question, QuestionKind};
use super::form_url::{canonical_form_url, submission_url};
use crate::{ExtractError, FetchError, ParseError};
use reqwest::{Client, StatusCode};

/// Fetches form pages and turns them into schemas
#[derive(Debug, Clone)]
pub struct SchemaExtractor {
    client: Client,
}

impl SchemaExtractor {
    /// Creates an extractor that issues requests through `client`
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches the form at `url` and extracts its schema
    ///
    /// # Response Handling
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 200 | Parse the page |
    /// | HTTP 429 | `FetchError::RateLimited` |
    /// | Other status | `FetchError::Status` |
    /// | Transport failure | `FetchError::Http` |
    ///
    /// If the request was redirected, the final URL is canonicalized instead
    /// of the input so short links resolve to the real submission endpoint.
    pub async fn extract(&self, url: &str) -> Result<FormSchema, ExtractError> {
        let canonical = canonical_form_url(url).map_err(FetchError::from)?;

        tracing::debug!("Fetching form page: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::error!("Form fetch rate limited (429): {}", url);
            return Err(FetchError::RateLimited {
                url: url.to_string(),
            }
            .into());
        }
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let final_url = response.url().to_string();
        let canonical = if final_url != url {
            tracing::debug!("Form page redirected to {}", final_url);
            canonical_form_url(&final_url).unwrap_or(canonical)
        } else {
            canonical
        };

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        let schema = parse_form_page(url, &canonical, &body)?;
        tracing::info!(
            "Extracted {} questions and {} hidden fields from {}",
            schema.questions.len(),
            schema.hidden_fields.len(),
            url
        );
        Ok(schema)
    }
}

/// Builds a schema from an already fetched page
///
/// # Arguments
///
/// * `url` - The URL the page was requested from
/// * `canonical` - Canonical form identifier (see `canonical_form_url`)
/// * `html` - The page body
pub fn parse_form_page(url: &str, canonical: &str, html: &str) -> Result<FormSchema, ParseError> {
    let raw_questions = decode_blob(locate_blob(html)?)?;

    let mut schema = FormSchema::new(url, submission_url(canonical));

    for raw in raw_questions {
        for detail in raw.details {
            let kind = QuestionKind::classify(raw.type_code, !detail.options.is_empty());
            schema.insert_question(Question {
                id: format!("entry.{}", detail.entry_id),
                text: raw.text.clone(),
                kind,
                options: detail.options,
                required: detail.required,
            });
        }
    }

    schema.hidden_fields = extract_hidden_fields(html);

    Ok(schema)
}
