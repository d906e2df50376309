//! Configuration from environment variables (a `.env` file is loaded at startup).

use std::env;
use std::time::Duration;

use url::Url;

use crate::core::math::MathPolicy;
use crate::core::persistence;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_MAX_SESSIONS: u32 = 50;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the chat backend; `/chat` is appended.
    pub backend_url: Url,
    /// `user_id` sent with every prompt.
    pub user_id: String,
    /// Provider override; `None` lets the backend pick its default.
    pub provider: Option<String>,
    pub math_policy: MathPolicy,
    /// Stored sessions kept on disk; 0 = unlimited.
    pub max_sessions: u32,
    pub request_timeout: Duration,
    pub show_timestamps: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TEXCHAT_BACKEND_URL is not a valid http(s) URL: {0}")]
    InvalidBackendUrl(String),
    #[error("TEXCHAT_MATH_POLICY: {0}")]
    InvalidMathPolicy(#[from] crate::core::math::ParsePolicyError),
    #[error("{name} must be a non-negative integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

/// Load configuration from the process environment. The remembered provider from the
/// last TUI session is used when `TEXCHAT_PROVIDER` is unset.
pub fn load() -> Result<Config, ConfigError> {
    let mut config = from_lookup(|key| env::var(key).ok())?;
    if config.provider.is_none() {
        config.provider = persistence::load_last_provider();
    }
    Ok(config)
}

/// Build configuration from any key lookup (environment in production, a map in tests).
pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let raw_url = get("TEXCHAT_BACKEND_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
    let backend_url = parse_backend_url(&raw_url)?;

    let user_id = get("TEXCHAT_USER_ID")
        .or_else(|| get("USER"))
        .unwrap_or_else(|| "local".to_string());

    let math_policy = match get("TEXCHAT_MATH_POLICY") {
        Some(p) => p.parse()?,
        None => MathPolicy::default(),
    };

    let max_sessions = parse_number("TEXCHAT_MAX_SESSIONS", get("TEXCHAT_MAX_SESSIONS"))?
        .map(|n| n as u32)
        .unwrap_or(DEFAULT_MAX_SESSIONS);
    let timeout_secs = parse_number("TEXCHAT_TIMEOUT_SECS", get("TEXCHAT_TIMEOUT_SECS"))?
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let show_timestamps = get("TEXCHAT_SHOW_TIMESTAMPS")
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false);

    Ok(Config {
        backend_url,
        user_id,
        provider: get("TEXCHAT_PROVIDER"),
        math_policy,
        max_sessions,
        request_timeout: Duration::from_secs(timeout_secs),
        show_timestamps,
    })
}

fn parse_backend_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidBackendUrl(format!("{raw} ({e})")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidBackendUrl(format!(
            "{raw} (unsupported scheme '{other}')"
        ))),
    }
}

fn parse_number(name: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    value
        .map(|v| {
            v.parse::<u32>()
                .map(u64::from)
                .map_err(|_| ConfigError::InvalidNumber { name, value: v })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let c = from_lookup(lookup(&[])).expect("defaults");
        assert_eq!(c.backend_url.as_str(), "http://localhost:8000/");
        assert_eq!(c.user_id, "local");
        assert_eq!(c.provider, None);
        assert_eq!(c.math_policy, MathPolicy::Strict);
        assert_eq!(c.max_sessions, 50);
        assert_eq!(c.request_timeout, Duration::from_secs(60));
        assert!(!c.show_timestamps);
    }

    #[test]
    fn reads_every_variable() {
        let c = from_lookup(lookup(&[
            ("TEXCHAT_BACKEND_URL", "https://chat.example.com/api/"),
            ("TEXCHAT_USER_ID", "ian"),
            ("TEXCHAT_PROVIDER", "gemini"),
            ("TEXCHAT_MATH_POLICY", "Permissive"),
            ("TEXCHAT_MAX_SESSIONS", "0"),
            ("TEXCHAT_TIMEOUT_SECS", "5"),
            ("TEXCHAT_SHOW_TIMESTAMPS", "yes"),
        ]))
        .expect("config");
        assert_eq!(c.backend_url.host_str(), Some("chat.example.com"));
        assert_eq!(c.user_id, "ian");
        assert_eq!(c.provider.as_deref(), Some("gemini"));
        assert_eq!(c.math_policy, MathPolicy::Permissive);
        assert_eq!(c.max_sessions, 0);
        assert_eq!(c.request_timeout, Duration::from_secs(5));
        assert!(c.show_timestamps);
    }

    #[test]
    fn user_falls_back_to_login_name() {
        let c = from_lookup(lookup(&[("USER", "ada")])).expect("config");
        assert_eq!(c.user_id, "ada");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let c = from_lookup(lookup(&[("TEXCHAT_PROVIDER", "  ")])).expect("config");
        assert_eq!(c.provider, None);
    }

    #[test]
    fn rejects_bad_url_and_scheme() {
        assert!(matches!(
            from_lookup(lookup(&[("TEXCHAT_BACKEND_URL", "not a url")])),
            Err(ConfigError::InvalidBackendUrl(_))
        ));
        assert!(matches!(
            from_lookup(lookup(&[("TEXCHAT_BACKEND_URL", "ftp://host")])),
            Err(ConfigError::InvalidBackendUrl(_))
        ));
    }

    #[test]
    fn rejects_bad_policy_and_numbers() {
        let err = from_lookup(lookup(&[("TEXCHAT_MATH_POLICY", "loose")])).unwrap_err();
        assert!(err.to_string().contains("loose"));
        let err = from_lookup(lookup(&[("TEXCHAT_TIMEOUT_SECS", "-1")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                name: "TEXCHAT_TIMEOUT_SECS",
                ..
            }
        ));
    }
}
