//! Capability endpoint resolution for copyguard-scan
//!
//! Resolves the external capability base URLs with ENV → TOML priority;
//! absent values fall back to the clients' compiled defaults.

use copyguard_common::config::TomlConfig;
use tracing::warn;

const TRANSCRIPT_URL_ENV: &str = "COPYGUARD_TRANSCRIPT_URL";
const ANALYSIS_URL_ENV: &str = "COPYGUARD_ANALYSIS_URL";

/// Resolve the transcript capability base URL, if configured
pub fn resolve_transcript_base_url(toml_config: &TomlConfig) -> Option<String> {
    resolve_url(
        TRANSCRIPT_URL_ENV,
        toml_config.transcript_base_url.as_deref(),
        "transcript",
    )
}

/// Resolve the media analysis capability base URL, if configured
pub fn resolve_analysis_base_url(toml_config: &TomlConfig) -> Option<String> {
    resolve_url(
        ANALYSIS_URL_ENV,
        toml_config.analysis_base_url.as_deref(),
        "analysis",
    )
}

fn resolve_url(env_var: &str, toml_value: Option<&str>, label: &str) -> Option<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| is_valid_url(v));
    let toml_value = toml_value.filter(|v| is_valid_url(v)).map(str::to_string);

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} base URL found in both environment and TOML, using environment",
            label
        );
    }

    env_value.or(toml_value)
}

/// Validate a configured URL (non-empty, parseable, http/https)
pub fn is_valid_url(value: &str) -> bool {
    match reqwest::Url::parse(value.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
