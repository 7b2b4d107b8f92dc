use crate::answers::OverrideMap;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for a formcast run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub form: FormConfig,
    #[serde(default)]
    pub dispatch: DispatchSettings,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub answers: AnswersConfig,
}

/// Target form
#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    /// Public URL of the form (view or edit link)
    pub url: String,
}

/// Submission volume and retry behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Number of submissions to send
    pub count: u64,

    /// Number of concurrent workers
    pub workers: u32,

    /// Retries allowed per submission before it is recorded as failed
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Fixed delay before each request (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            count: 100,
            workers: 10,
            max_retries: 20,
            request_timeout_secs: 30,
            request_delay_ms: 100,
        }
    }
}

/// Client identification sent with every request
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the client
    #[serde(rename = "client-name")]
    pub client_name: String,

    /// Version of the client
    #[serde(rename = "client-version")]
    pub client_version: String,

    /// URL with information about the client
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for contact about this traffic
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.client_name, self.client_version, self.contact_url, self.contact_email
        )
    }
}

/// Answer generation settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswersConfig {
    /// Answer used for every free-text question instead of generated text
    #[serde(rename = "default-text")]
    pub default_text: Option<String>,

    /// Seed for reproducible answer generation
    pub seed: Option<u64>,

    /// Separate override file, merged over the inline overrides
    #[serde(rename = "overrides-path")]
    pub overrides_path: Option<PathBuf>,

    /// Inline overrides keyed by question id
    #[serde(default)]
    pub overrides: OverrideMap,
}
