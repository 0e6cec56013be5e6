//! Configuration for retry loops

use crate::error::{ConfigError, Result};
use crate::retry::{Backoff, DelayBounds, Jitter};
use serde::{Deserialize, Serialize};
use std::env::VarError;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable overriding [`RetryConfig::attempts`].
pub const ENV_ATTEMPTS: &str = "BACKOFF_ATTEMPTS";
/// Environment variable overriding [`RetryConfig::min_delay`], in milliseconds.
pub const ENV_MIN_DELAY_MS: &str = "BACKOFF_MIN_DELAY_MS";
/// Environment variable overriding [`RetryConfig::max_delay`], in milliseconds.
pub const ENV_MAX_DELAY_MS: &str = "BACKOFF_MAX_DELAY_MS";
/// Environment variable overriding [`RetryConfig::jitter`].
pub const ENV_JITTER: &str = "BACKOFF_JITTER";

/// Serializable description of a retry loop.
///
/// Delays are written as whole milliseconds so the struct reads naturally
/// from TOML, YAML or JSON:
///
/// ```toml
/// attempts = 5
/// min_delay_ms = 100
/// max_delay_ms = 3000
/// jitter = "decorrelated"
/// ```
///
/// Missing fields fall back to [`RetryConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of invocations of the operation
    pub attempts: u32,

    /// Smallest pause between attempts
    #[serde(rename = "min_delay_ms", with = "duration_ms")]
    pub min_delay: Duration,

    /// Largest pause between attempts
    #[serde(rename = "max_delay_ms", with = "duration_ms")]
    pub max_delay: Duration,

    /// How each pause is chosen
    pub jitter: Jitter,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            min_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(3),
            jitter: Jitter::Exponential,
        }
    }
}

impl RetryConfig {
    /// Defaults overlaid with any `BACKOFF_*` environment variables.
    ///
    /// Unset variables keep their default; set but unparsable ones are an
    /// error rather than being ignored.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(attempts) = env_parse(ENV_ATTEMPTS)? {
            config.attempts = attempts;
        }
        if let Some(ms) = env_parse(ENV_MIN_DELAY_MS)? {
            config.min_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse(ENV_MAX_DELAY_MS)? {
            config.max_delay = Duration::from_millis(ms);
        }
        if let Some(jitter) = env_value(ENV_JITTER)? {
            config.jitter = jitter.parse()?;
        }

        Ok(config)
    }

    /// Set the attempt budget.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Set both delay bounds.
    pub fn with_delays(mut self, min: Duration, max: Duration) -> Self {
        self.min_delay = min;
        self.max_delay = max;
        self
    }

    /// Set the jitter strategy.
    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    /// Reject budgets of zero and inverted delay bounds.
    pub fn validate(&self) -> Result<()> {
        if self.attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.min_delay > self.max_delay {
            return Err(ConfigError::InvertedBounds {
                min: self.min_delay,
                max: self.max_delay,
            });
        }
        Ok(())
    }

    /// Validate and build the retry loop.
    pub fn backoff(&self) -> Result<Backoff> {
        self.validate()?;
        Ok(Backoff::with_strategy(
            self.attempts,
            DelayBounds::new(self.min_delay, self.max_delay),
            self.jitter,
        ))
    }
}

impl TryFrom<RetryConfig> for Backoff {
    type Error = ConfigError;

    fn try_from(config: RetryConfig) -> Result<Self> {
        config.backoff()
    }
}

/// Raw value of `var`; only an unset variable counts as absent.
fn env_value(var: &'static str) -> Result<Option<String>> {
    match std::env::var(var) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(ConfigError::InvalidEnv {
            var,
            value: raw.to_string_lossy().into_owned(),
        }),
    }
}

fn env_parse<T: FromStr>(var: &'static str) -> Result<Option<T>> {
    match env_value(var)? {
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(ConfigError::InvalidEnv { var, value }),
        },
        None => Ok(None),
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
