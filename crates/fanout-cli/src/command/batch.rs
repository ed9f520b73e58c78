use clap::Args;
use tracing::info;

use crate::command::{print_outcomes, simulated};
use crate::core::{parse_seconds, resolve_settings, Error};

#[derive(Args, Clone)]
pub struct BatchParameters {
    #[clap(long, help = "Timeout shared by the batch in seconds, defaults to FANOUT_TIMEOUT or 10s")]
    pub timeout: Option<f64>,

    #[clap(long, required = true, help = "Simulated work duration in seconds, one per unit")]
    pub work: Vec<f64>,

    #[clap(long, help = "Position of a unit that fails once its work is done")]
    pub fail: Vec<usize>,
}

pub async fn command_batch(params: BatchParameters) -> Result<(), Error> {
    let settings = resolve_settings(params.timeout)?;

    if let Some(index) = params.fail.iter().find(|index| **index >= params.work.len()) {
        return Err(Error::Validation(format!("no unit at position {}", index)));
    }

    let mut units = Vec::with_capacity(params.work.len());
    for (index, work) in params.work.iter().enumerate() {
        units.push(simulated(index, parse_seconds(*work)?, params.fail.contains(&index)));
    }

    info!("running {} units with a shared timeout of {:?}", units.len(), settings.timeout());
    let outcomes = fanout::run_all(units, &settings).await;

    print_outcomes("run_all", &outcomes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::command::batch::{command_batch, BatchParameters};
    use crate::core::Error;

    #[tokio::test]
    async fn reject_failure_outside_of_batch() {
        let params = BatchParameters {
            timeout: Some(1.0),
            work: vec![0.0],
            fail: vec![3],
        };

        let result = command_batch(params).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
