//! Run independently failable units of work concurrently, each run bounded by a timeout,
//! and collect one outcome per unit in the order the units were given.
//!
//! - [`run`] executes a single unit and stops waiting for it once the deadline elapses.
//! - [`run_all`] executes many units against one shared deadline and joins all of them.

pub mod concurrency;
pub mod configuration;
mod macros;

pub use concurrency::{blocking, run, run_all, run_all_default, run_all_with, run_default, run_with, Batch, Deadline, Error, Outcomes, WorkUnit};
pub use configuration::{Adjustment, Settings};
pub use tracing;
