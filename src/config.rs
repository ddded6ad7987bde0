use std::fmt;

use serde::Deserialize;

const ENV_API_URL: &str = "KOLMISOFT_API_URL";
const ENV_USERNAME: &str = "KOLMISOFT_USERNAME";
const ENV_PASSWORD: &str = "KOLMISOFT_PASSWORD";
const ENV_AUTH_KEY: &str = "KOLMISOFT_AUTH_KEY";
const ENV_USE_HASH: &str = "KOLMISOFT_USE_HASH";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    MissingVar(&'static str),

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("invalid API URL: {input}")]
    InvalidUrl { input: String },

    #[error("{var} must be true/false/1/0, got {value}")]
    InvalidBool { var: &'static str, value: String },
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
/// Connection settings and credentials for one MOR installation.
///
/// `api_url` is the billing root, e.g. `https://mor.example.com/billing`;
/// endpoint paths such as `/api/user_login` are appended to it.
pub struct Config {
    pub api_url: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// API secret key shared with the server; only used as hash input.
    pub auth_key: String,
    /// Attach a `hash` parameter to every request.
    #[serde(default = "default_use_hash")]
    pub use_hash: bool,
}

fn default_use_hash() -> bool {
    true
}

impl Config {
    /// Settings with an empty password and hashing enabled.
    pub fn new(
        api_url: impl Into<String>,
        username: impl Into<String>,
        auth_key: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            username: username.into(),
            password: String::new(),
            auth_key: auth_key.into(),
            use_hash: true,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_use_hash(mut self, use_hash: bool) -> Self {
        self.use_hash = use_hash;
        self
    }

    /// Read `KOLMISOFT_API_URL`, `KOLMISOFT_USERNAME`, `KOLMISOFT_AUTH_KEY` and the
    /// optional `KOLMISOFT_PASSWORD` / `KOLMISOFT_USE_HASH`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let required =
            |var: &'static str| std::env::var(var).map_err(|_| ConfigError::MissingVar(var));

        let mut config = Self::new(
            required(ENV_API_URL)?,
            required(ENV_USERNAME)?,
            required(ENV_AUTH_KEY)?,
        );
        if let Ok(password) = std::env::var(ENV_PASSWORD) {
            config.password = password;
        }
        if let Ok(value) = std::env::var(ENV_USE_HASH) {
            config.use_hash = parse_bool(ENV_USE_HASH, &value)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check the URL and username; returns the API root without a trailing `/`.
    pub fn validate(&self) -> Result<String, ConfigError> {
        let parsed = url::Url::parse(self.api_url.trim()).map_err(|_| ConfigError::InvalidUrl {
            input: self.api_url.clone(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidUrl {
                input: self.api_url.clone(),
            });
        }
        if self.username.trim().is_empty() {
            return Err(ConfigError::Empty { field: "username" });
        }
        Ok(self.api_url.trim().trim_end_matches('/').to_owned())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("auth_key", &"<redacted>")
            .field("use_hash", &self.use_hash)
            .finish()
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new("https://mor.example.com/billing", "admin", "secret");
        assert_eq!(config.password, "");
        assert!(config.use_hash);
    }

    #[test]
    fn validate_trims_trailing_slash() {
        let config = Config::new("https://mor.example.com/billing/", "admin", "secret");
        assert_eq!(
            config.validate().unwrap(),
            "https://mor.example.com/billing"
        );
    }

    #[test]
    fn validate_rejects_bad_urls_and_blank_username() {
        let config = Config::new("mor.example.com", "admin", "secret");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { .. })
        ));

        let config = Config::new("ftp://mor.example.com", "admin", "secret");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { .. })
        ));

        let config = Config::new("https://mor.example.com", " ", "secret");
        assert_eq!(
            config.validate(),
            Err(ConfigError::Empty { field: "username" })
        );
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = Config::new("https://mor.example.com", "admin", "top-secret")
            .with_password("hunter2");
        let debug = format!("{config:?}");
        assert!(!debug.contains("top-secret"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("admin"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"api_url": "https://mor.example.com/billing", "username": "admin", "auth_key": "k"}"#,
        )
        .unwrap();
        assert_eq!(config.password, "");
        assert!(config.use_hash);
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool(ENV_USE_HASH, "TRUE"), Ok(true));
        assert_eq!(parse_bool(ENV_USE_HASH, "0"), Ok(false));
        assert!(parse_bool(ENV_USE_HASH, "maybe").is_err());
    }
}
