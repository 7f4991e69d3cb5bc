use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

use careerbot_llm::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Development fallback. Tokens signed with it are only safe locally.
const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// Secrets copied from sample configs that must not sign real tokens.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "your-secret-key-change-in-production",
];

/// Not `Debug`: holds the signing secret and the API key.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// `None` runs the server with authentication and conversations disabled.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub openai_timeout: Duration,
    pub answer_requires_auth: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) if !PLACEHOLDER_SECRETS.contains(&secret.as_str()) => secret,
            Some(_) => {
                warn!("JWT_SECRET is still a placeholder value; set a random secret for production");
                DEV_JWT_SECRET.to_string()
            }
            None => {
                warn!("JWT_SECRET not set; using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let port = var("CAREERBOT_PORT")
            .unwrap_or_else(|| "3001".into())
            .parse::<u16>()
            .context("CAREERBOT_PORT must be a port number")?;

        let openai_timeout = var("OPENAI_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("OPENAI_TIMEOUT_SECS must be a number of seconds")?
            .unwrap_or(60);

        let answer_requires_auth = var("ANSWER_REQUIRES_AUTH")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Ok(Self {
            host: var("CAREERBOT_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            database_url: var("DATABASE_URL"),
            jwt_secret,
            openai_api_key: var("OPENAI_API_KEY").unwrap_or_default(),
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            openai_base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            openai_timeout: Duration::from_secs(openai_timeout),
            answer_requires_auth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.port, 3001);
        assert_eq!(cfg.host, "0.0.0.0");
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(cfg.openai_model, "gpt-4o-mini");
        assert_eq!(cfg.openai_timeout, Duration::from_secs(60));
        assert!(!cfg.answer_requires_auth);
    }

    #[test]
    fn explicit_values_win() {
        let cfg = config(&[
            ("DATABASE_URL", "careerbot.db"),
            ("JWT_SECRET", "s3cr3t"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("CAREERBOT_PORT", "8080"),
            ("ANSWER_REQUIRES_AUTH", "true"),
        ])
        .unwrap();
        assert_eq!(cfg.database_url.as_deref(), Some("careerbot.db"));
        assert_eq!(cfg.jwt_secret, "s3cr3t");
        assert_eq!(cfg.openai_model, "gpt-4o");
        assert_eq!(cfg.port, 8080);
        assert!(cfg.answer_requires_auth);
    }

    #[test]
    fn placeholder_secret_is_replaced() {
        let cfg = config(&[("JWT_SECRET", "your-secret-key-change-in-production")]).unwrap();
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
    }

    #[test]
    fn empty_database_url_means_unset() {
        let cfg = config(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(cfg.database_url.is_none());
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(config(&[("CAREERBOT_PORT", "http")]).is_err());
    }
}
