use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn, Instrument};

use crate::concurrency::{Deadline, Error, Outcomes, WorkUnit};
use crate::configuration::{Adjustment, Settings};
use crate::{measure_duration, metric};

/// Set of units executed together against a single shared deadline.
///
/// Units are only registered by [`Batch::register`], nothing runs until [`Batch::execute`]
/// is called. Every call to execute spawns one task per unit; tasks are never reused.
///
/// Example
/// ```rust
///  use fanout::concurrency::Batch;
///  use fanout::{unit, Settings};
///
///  let mut batch = Batch::new(Settings::default());
///  batch.register(unit!(|_| { Ok::<_, String>(1) }));
///  batch.register(unit!(|_| { Ok::<_, String>(2) }));
///
///  let outcomes = batch.execute().await;
/// ```
pub struct Batch<T, E> {
    settings: Settings,

    units: Vec<WorkUnit<T, E>>,
}

impl<T: 'static + Send, E: 'static + Send> Batch<T, E> {
    pub fn new(settings: Settings) -> Self {
        Self { settings, units: Vec::new() }
    }

    /// Register a new unit. The macro [`unit!`](crate::unit) can be used to improve readability.
    /// The position of the outcome in the [`Outcomes`] is the registration order.
    pub fn register(&mut self, unit: WorkUnit<T, E>) -> &mut Self {
        self.units.push(unit);
        self
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Execute all the registered units concurrently and wait for every one of them to
    /// finish, even past the deadline. For each unit:
    ///
    /// - If it completes before the deadline, its own value or error is recorded.
    /// - If it completes after the deadline with a value, [`Error::Timeout`] is recorded and
    ///   the value is dropped.
    /// - If it completes after the deadline with an error, that error is recorded since the
    ///   unit's own error takes precedence over the timeout.
    ///
    /// The registered units are consumed, executing twice yields empty outcomes the second time.
    #[instrument(name = "execute", skip_all, fields(units = self.units.len(), timeout = ?self.settings.timeout()))]
    pub async fn execute(&mut self) -> Outcomes<T, E> {
        let deadline = Deadline::after(self.settings.timeout());

        let handles: Vec<JoinHandle<Result<T, Error<E>>>> = self
            .units
            .drain(..)
            .map(|unit| tokio::spawn(settle(unit, deadline).in_current_span()))
            .collect();

        debug!("started {} units", handles.len());

        let (slots, duration) = measure_duration!({
            let mut slots = Vec::with_capacity(handles.len());
            for (index, handle) in handles.into_iter().enumerate() {
                let slot = match handle.await {
                    Ok(slot) => slot,
                    Err(e) => {
                        warn!(index, "unit panicked");
                        Err(Error::from(e))
                    },
                };

                if matches!(slot, Err(Error::Timeout)) {
                    warn!(index, "unit timed out");
                    metric!(counter [ units_timed_out ] = 1);
                }

                slots.push(slot);
            }

            slots
        });

        metric!(histogram [ batch_duration_ms ] = duration.as_millis(), units = slots.len());
        debug!("all units finished");

        Outcomes::new(slots)
    }
}

/// Run a unit to completion and decide the outcome recorded in its slot
async fn settle<T, E>(unit: WorkUnit<T, E>, deadline: Deadline) -> Result<T, Error<E>> {
    match unit(deadline).await {
        Ok(_) if deadline.is_elapsed() => Err(Error::Timeout),
        result => result,
    }
}

/// Run all the units concurrently against a deadline shared by the whole batch. The
/// outcomes are aligned by position with `units`.
pub async fn run_all<T, E>(units: impl IntoIterator<Item = WorkUnit<T, E>>, settings: &Settings) -> Outcomes<T, E>
where
    T: 'static + Send,
    E: 'static + Send,
{
    let mut batch = Batch::new(*settings);
    for unit in units {
        batch.register(unit);
    }

    batch.execute().await
}

/// Run all the units with settings resolved from the given adjustments
pub async fn run_all_with<T, E>(units: impl IntoIterator<Item = WorkUnit<T, E>>, adjustments: impl IntoIterator<Item = Adjustment>) -> Outcomes<T, E>
where
    T: 'static + Send,
    E: 'static + Send,
{
    run_all(units, &Settings::resolve(adjustments)).await
}

/// Run all the units with the default settings
pub async fn run_all_default<T, E>(units: impl IntoIterator<Item = WorkUnit<T, E>>) -> Outcomes<T, E>
where
    T: 'static + Send,
    E: 'static + Send,
{
    run_all(units, &Settings::default()).await
}
