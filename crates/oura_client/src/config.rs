use crate::OuraError;
use secrecy::SecretString;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.ouraring.com/v2/usercollection";

#[derive(Clone, Debug)]
pub struct Config {
    /// Token to start with; it can also be supplied later through `configure`.
    pub personal_access_token: Option<SecretString>,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            personal_access_token: None,
            base_url: DEFAULT_BASE_URL.into(),
            timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, OuraError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, OuraError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let personal_access_token = get("OURA_PERSONAL_ACCESS_TOKEN")
            .filter(|t| !t.is_empty())
            .map(SecretString::from);
        let base_url = get("OURA_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let timeout = match get("OURA_TIMEOUT_SECS") {
            None => None,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(OuraError::Config(format!(
                        "OURA_TIMEOUT_SECS must be a positive integer, got {raw:?}"
                    )));
                }
            },
        };
        Ok(Self {
            personal_access_token,
            base_url,
            timeout,
        })
    }
}
