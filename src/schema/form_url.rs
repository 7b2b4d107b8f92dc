//! Form URL canonicalization and submission endpoint derivation

use crate::UrlError;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Path suffixes that select a view of the form rather than the form itself
const VIEW_SUFFIXES: &[&str] = &["/viewform", "/edit"];

/// Path segment that accepts submissions
const SUBMISSION_SEGMENT: &str = "/formResponse";

fn account_segment() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/u/\d+/").expect("static regex"))
}

/// Reduces a form URL to its canonical identifier
///
/// # Steps
///
/// 1. Parse the URL; reject non-HTTP(S) schemes
/// 2. Cut everything from the first `/viewform`, then from the first `/edit`
/// 3. Remove a trailing slash
///
/// # Examples
///
/// ```
/// use formcast::schema::canonical_form_url;
///
/// let url = canonical_form_url("https://docs.google.com/forms/d/e/abc/viewform?usp=sf_link").unwrap();
/// assert_eq!(url, "https://docs.google.com/forms/d/e/abc");
/// ```
pub fn canonical_form_url(url_str: &str) -> Result<String, UrlError> {
    let url_str = url_str.trim();
    let parsed = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            parsed.scheme()
        )));
    }

    let mut clean = url_str;
    for suffix in VIEW_SUFFIXES {
        if let Some(idx) = clean.find(suffix) {
            clean = &clean[..idx];
        }
    }

    Ok(clean.strip_suffix('/').unwrap_or(clean).to_string())
}

/// Derives the submission endpoint from a canonical form identifier
///
/// Per-account segments such as `/u/0/` collapse to `/`.
pub fn submission_url(canonical: &str) -> String {
    let site_root = account_segment().replace_all(canonical, "/");
    format!("{}{}", site_root, SUBMISSION_SEGMENT)
}
