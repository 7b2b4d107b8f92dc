//! Configuration module for formcast
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use formcast::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("formcast.toml")).unwrap();
//! println!("Sending {} submissions", config.dispatch.count);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AnswersConfig, Config, DispatchSettings, FormConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
