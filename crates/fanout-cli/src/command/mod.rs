use std::time::Duration;

use fanout::{unit, Error, Outcomes, WorkUnit};
use tokio::time;

use crate::core::SimulatedFailure;

pub mod batch;
pub mod demo;
pub mod single;

/// Unit sleeping for `work` before returning either a value or a failure
pub fn simulated(index: usize, work: Duration, fail: bool) -> WorkUnit<String, SimulatedFailure> {
    unit!(|_| {
        time::sleep(work).await;
        if fail {
            Err(SimulatedFailure(index))
        } else {
            Ok(format!("result of unit {}", index))
        }
    })
}

pub fn describe(result: Result<&String, &Error<SimulatedFailure>>) -> String {
    match result {
        Ok(value) => format!("result = {}, error = none", value),
        Err(error) => format!("result = none, error = {}", error),
    }
}

pub fn print_outcomes(label: &str, outcomes: &Outcomes<String, SimulatedFailure>) {
    for index in 0..outcomes.len() {
        if let Some(result) = outcomes.get(index) {
            println!("{}: [{}] {}", label, index, describe(result));
        }
    }
}
