use std::time::Duration;

use fanout::Settings;
use thiserror::Error;

mod tracing;
pub use self::tracing::{Fmt, Verbosity};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] fanout::configuration::Error),

    #[error("CLI validation error: {0}")]
    Validation(String),
}

/// Error returned by the simulated units
#[derive(Error, Debug)]
#[error("unit {0} failed")]
pub struct SimulatedFailure(pub usize);

/// Resolve the settings of a command: environment first, then the timeout given on the
/// command line if any.
pub fn resolve_settings(timeout: Option<f64>) -> Result<Settings, Error> {
    resolve_settings_from(std::env::vars(), timeout)
}

/// Same as [`resolve_settings`] but reading the environment from the given variables
pub fn resolve_settings_from<I>(variables: I, timeout: Option<f64>) -> Result<Settings, Error>
where
    I: IntoIterator<Item = (String, String)>,
{
    let settings = Settings::from_variables(variables)?;

    match timeout {
        Some(seconds) => Ok(settings.with_timeout(parse_seconds(seconds)?)),
        None => Ok(settings),
    }
}

pub fn parse_seconds(seconds: f64) -> Result<Duration, Error> {
    Duration::try_from_secs_f64(seconds).map_err(|e| Error::Validation(format!("invalid duration {}: {}", seconds, e)))
}
