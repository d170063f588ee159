//! Configuration resolved from the process environment.
//!
//! A missing API key is a fatal startup condition: nothing else in the crate
//! can run without one, so binaries are expected to resolve [`Settings`]
//! first and halt with the error message if resolution fails.

use std::num::ParseIntError;
use std::time::Duration;

use snafu::{OptionExt, ResultExt, Snafu};

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
/// Environment variable overriding the model resource name.
pub const ENV_MODEL: &str = "VIDSAGE_MODEL";
/// Environment variable overriding the ingestion poll interval, in seconds.
pub const ENV_POLL_INTERVAL: &str = "VIDSAGE_POLL_INTERVAL_SECS";
/// Environment variable overriding the ingestion poll deadline, in seconds.
pub const ENV_POLL_TIMEOUT: &str = "VIDSAGE_POLL_TIMEOUT_SECS";

/// Default interval between readiness polls while a video is processing.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Default deadline for a video to finish remote processing.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Snafu)]
pub enum Error {
    /// The API key variable is unset or blank
    #[snafu(display("{ENV_API_KEY} is not set; export it before starting"))]
    MissingApiKey,

    /// A numeric override did not parse
    #[snafu(display("invalid value '{value}' for {var}: expected whole seconds"))]
    InvalidDuration {
        var: String,
        value: String,
        source: ParseIntError,
    },
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API key for the Gemini API.
    pub api_key: String,
    /// Model resource name used for generation.
    pub model: String,
    /// Interval between readiness polls during ingestion.
    pub poll_interval: Duration,
    /// Deadline for remote processing before ingestion fails.
    pub poll_timeout: Duration,
}

impl Settings {
    /// Settings with the given API key and defaults for everything else.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: crate::client::DEFAULT_MODEL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }

    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.trim().is_empty())
            .context(MissingApiKeySnafu)?;

        let mut settings = Self::new(api_key);
        if let Some(model) = lookup(ENV_MODEL) {
            settings.model = model;
        }
        if let Some(secs) = lookup(ENV_POLL_INTERVAL) {
            settings.poll_interval = Duration::from_secs(parse_secs(ENV_POLL_INTERVAL, &secs)?);
        }
        if let Some(secs) = lookup(ENV_POLL_TIMEOUT) {
            settings.poll_timeout = Duration::from_secs(parse_secs(ENV_POLL_TIMEOUT, &secs)?);
        }
        Ok(settings)
    }
}

fn parse_secs(var: &str, value: &str) -> Result<u64, Error> {
    value.trim().parse().context(InvalidDurationSnafu {
        var: var.to_string(),
        value: value.to_string(),
    })
}
