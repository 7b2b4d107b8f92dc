//! Integration tests for formcast
//!
//! These tests use wiremock to stand in for the form host and exercise
//! extraction and dispatch end-to-end over real HTTP.

mod dispatch_tests;
mod extract_tests;

use formcast::config::UserAgentConfig;

/// Identification used by every test client
pub fn test_user_agent() -> UserAgentConfig {
    UserAgentConfig {
        client_name: "TestClient".to_string(),
        client_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}
