use std::time::Duration;

use fanout::{Adjustment, Settings};
use tracing::info;

use crate::command::{describe, print_outcomes, simulated};
use crate::core::Error;

const WORK: Duration = Duration::from_secs(2);

/// Replay the reference scenarios: a single unit with the default and a short timeout,
/// then two units with the default and a custom shared timeout.
pub async fn command_demo() -> Result<(), Error> {
    let settings = Settings::from_env()?;

    info!("single unit with timeout {:?}", settings.timeout());
    let result = fanout::run(simulated(0, WORK, false), &settings).await;
    println!("run: {}", describe(result.as_ref()));

    let short = settings.adjust([Adjustment::Timeout(Duration::from_secs(1))]);
    info!("single unit with timeout {:?}", short.timeout());
    let result = fanout::run(simulated(0, WORK, false), &short).await;
    println!("run with custom timeout: {}", describe(result.as_ref()));

    info!("two units with timeout {:?}", settings.timeout());
    let outcomes = fanout::run_all(vec![simulated(0, WORK, false), simulated(1, WORK, false)], &settings).await;
    print_outcomes("run_all", &outcomes);

    let custom = settings.adjust([Adjustment::Timeout(Duration::from_secs(5))]);
    info!("two units with timeout {:?}", custom.timeout());
    let outcomes = fanout::run_all(vec![simulated(0, WORK, false), simulated(1, WORK, false)], &custom).await;
    print_outcomes("run_all with custom timeout", &outcomes);

    Ok(())
}
