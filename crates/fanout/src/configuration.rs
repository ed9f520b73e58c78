use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSecondsWithFrac};
use thiserror::Error;

/// Timeout applied when no [`Adjustment::Timeout`] is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const ENVIRONMENT_PREFIX: &str = "FANOUT_";

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error {0}")]
    Configuration(String),
}

/// A single adjustment applied over the default [`Settings`]. Adjustments are
/// applied in order and the last one targeting a field wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjustment {
    /// Bound the execution by the given duration
    Timeout(Duration),
}

impl Adjustment {
    fn apply(self, mut settings: Settings) -> Settings {
        match self {
            Adjustment::Timeout(timeout) => settings.timeout = timeout,
        }

        settings
    }
}

/// Settings of a single executor invocation. Once resolved the value is immutable,
/// builder methods return a new value.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Wall-clock window, in seconds when serialized, after which pending units time out
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self { timeout: DEFAULT_TIMEOUT }
    }
}

impl From<Adjustment> for Settings {
    fn from(adjustment: Adjustment) -> Self {
        Self::resolve([adjustment])
    }
}

impl FromIterator<Adjustment> for Settings {
    fn from_iter<I: IntoIterator<Item = Adjustment>>(iter: I) -> Self {
        Self::resolve(iter)
    }
}

#[derive(Deserialize)]
struct Environment {
    timeout: Option<f64>,
}

impl Settings {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Resolve the settings by applying the adjustments in order over the default ones.
    pub fn resolve(adjustments: impl IntoIterator<Item = Adjustment>) -> Self {
        Self::default().adjust(adjustments)
    }

    /// Apply the adjustments in order over these settings
    pub fn adjust(self, adjustments: impl IntoIterator<Item = Adjustment>) -> Self {
        adjustments.into_iter().fold(self, |settings, adjustment| adjustment.apply(settings))
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.adjust([Adjustment::Timeout(timeout)])
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Load the settings from the process environment. `FANOUT_TIMEOUT` gives the timeout
    /// in seconds; when absent the default timeout is kept.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_variables(std::env::vars())
    }

    /// Same as [`Settings::from_env`] but reading from the given variables
    pub fn from_variables<I>(variables: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let environment: Environment = envy::prefixed(ENVIRONMENT_PREFIX)
            .from_iter(variables)
            .map_err(|e| Error::Configuration(e.to_string()))?;

        match environment.timeout {
            Some(seconds) => {
                let timeout = Duration::try_from_secs_f64(seconds).map_err(|e| Error::Configuration(format!("invalid timeout {}: {}", seconds, e)))?;
                Ok(Self::new(timeout))
            },
            None => Ok(Self::default()),
        }
    }

    /// Load the settings from a JSON file, missing fields take their default value.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let data = fs::read(path).map_err(|e| Error::Configuration(e.to_string()))?;

        serde_json::from_slice(&data).map_err(|e| Error::Configuration(e.to_string()))
    }
}
