//! HTTP client construction
//!
//! Every request identifies the client with the configured user agent:
//! `Name/Version (+ContactURL; ContactEmail)`.

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;

/// Connect timeout applied to every client
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds an HTTP client with proper identification
///
/// # Arguments
///
/// * `user_agent` - The client identification
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use formcast::config::UserAgentConfig;
/// use formcast::http::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     client_name: "formcast".to_string(),
///     client_version: "0.1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "ops@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}
