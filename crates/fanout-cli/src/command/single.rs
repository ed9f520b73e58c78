use clap::Args;
use tracing::info;

use crate::command::{describe, simulated};
use crate::core::{parse_seconds, resolve_settings, Error};

#[derive(Args, Clone)]
pub struct SingleParameters {
    #[clap(long, help = "Timeout in seconds, defaults to FANOUT_TIMEOUT or 10s")]
    pub timeout: Option<f64>,

    #[clap(long, default_value_t = 2.0, help = "Simulated work duration in seconds")]
    pub work: f64,

    #[clap(long, help = "Make the unit fail once its work is done")]
    pub fail: bool,
}

pub async fn command_single(params: SingleParameters) -> Result<(), Error> {
    let settings = resolve_settings(params.timeout)?;
    let work = parse_seconds(params.work)?;

    info!("running a single unit of {:?} with a timeout of {:?}", work, settings.timeout());
    let result = fanout::run(simulated(0, work, params.fail), &settings).await;

    println!("run: {}", describe(result.as_ref()));
    Ok(())
}
