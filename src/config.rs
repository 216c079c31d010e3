use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const ENV_API_URL: &str = "GHLENS_API_URL";
const ENV_TIMEOUT_SECS: &str = "GHLENS_TIMEOUT_SECS";
const ENV_SESSION_FILE: &str = "GHLENS_SESSION_FILE";

/// Runtime settings. Precedence: command line, then environment, then defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// `None` means the platform config directory is used.
    pub session_file: Option<PathBuf>,
}

/// Values given on the command line; each one wins over the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub session_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("ghlens/{}", env!("CARGO_PKG_VERSION")),
            session_file: None,
        }
    }
}

impl Config {
    pub fn load(overrides: Overrides) -> Result<Self, ConfigError> {
        Self::load_with(overrides, |key| std::env::var(key).ok())
    }

    fn load_with(
        overrides: Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(url) = overrides.api_url.or_else(|| lookup(ENV_API_URL)) {
            config.api_url = url;
        }

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => Some(secs),
            None => lookup(ENV_TIMEOUT_SECS)
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidNumber {
                            var: ENV_TIMEOUT_SECS,
                            value: raw,
                        })
                })
                .transpose()?,
        };
        if let Some(secs) = timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }

        config.session_file = overrides
            .session_file
            .or_else(|| lookup(ENV_SESSION_FILE).map(PathBuf::from));

        config.validate()?;
        Ok(config)
    }

    fn validate(&mut self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(self.api_url.clone()));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        // Endpoint paths are joined with a leading slash.
        while self.api_url.ends_with('/') {
            self.api_url.pop();
        }
        Ok(())
    }
}
