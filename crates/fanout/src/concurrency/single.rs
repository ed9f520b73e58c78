use tokio::time;
use tracing::{debug, instrument, warn, Instrument};

use crate::concurrency::{Deadline, Error, WorkUnit};
use crate::configuration::{Adjustment, Settings};
use crate::{measure_duration, metric};

/// Run a single unit bounded by the timeout of the given settings.
///
/// The unit is invoked on its own task, so the deadline bounds the closure as well as the
/// future it returns.
///
/// - If the unit completes before the deadline, its value or error is returned.
/// - Otherwise [`Error::Timeout`] is returned right away. The unit is not stopped: its
///   task keeps running detached and its eventual outcome is dropped.
///
/// The outcome of the unit is always checked before the timer, so a unit that has
/// completed wins over a deadline observed at the same time.
#[instrument(name = "run", skip_all, fields(timeout = ?settings.timeout()))]
pub async fn run<T, E>(unit: WorkUnit<T, E>, settings: &Settings) -> Result<T, Error<E>>
where
    T: 'static + Send,
    E: 'static + Send,
{
    let deadline = Deadline::after(settings.timeout());
    let handle = tokio::spawn(async move { unit(deadline).await }.in_current_span());

    let (result, duration) = measure_duration!(time::timeout_at(deadline.instant(), handle).await);
    metric!(histogram [ unit_duration_ms ] = duration.as_millis());

    match result {
        Ok(Ok(Ok(value))) => {
            debug!("unit completed");
            Ok(value)
        },
        Ok(Ok(Err(e))) => {
            debug!("unit failed");
            Err(e)
        },
        Ok(Err(e)) => {
            warn!("unit panicked");
            Err(Error::from(e))
        },
        Err(_) => {
            warn!("unit timed out, abandoning it");
            metric!(counter [ units_timed_out ] = 1);
            Err(Error::Timeout)
        },
    }
}

/// Run a single unit with settings resolved from the given adjustments
pub async fn run_with<T, E>(unit: WorkUnit<T, E>, adjustments: impl IntoIterator<Item = Adjustment>) -> Result<T, Error<E>>
where
    T: 'static + Send,
    E: 'static + Send,
{
    run(unit, &Settings::resolve(adjustments)).await
}

/// Run a single unit with the default settings
pub async fn run_default<T, E>(unit: WorkUnit<T, E>) -> Result<T, Error<E>>
where
    T: 'static + Send,
    E: 'static + Send,
{
    run(unit, &Settings::default()).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time;

    use crate::concurrency::{run, run_default, run_with, Error};
    use crate::configuration::{Adjustment, Settings};
    use crate::unit;

    #[tokio::test(start_paused = true)]
    async fn completes_before_timeout() {
        let result = run(
            unit!(|_| {
                time::sleep(Duration::from_secs(1)).await;
                Ok::<_, String>("ok")
            }),
            &Settings::new(Duration::from_secs(2)),
        )
        .await;

        assert_eq!(result.unwrap(), "ok");
    }

    #[tokio::test(start_paused = true)]
    async fn times_out() {
        let result = run_with(
            unit!(|_| {
                time::sleep(Duration::from_secs(2)).await;
                Ok::<_, String>("ok")
            }),
            [Adjustment::Timeout(Duration::from_secs(1))],
        )
        .await;

        let error = result.unwrap_err();
        assert!(error.is_timeout());
        assert_eq!(error.to_string(), "operation timed out");
    }

    #[tokio::test(start_paused = true)]
    async fn returns_unit_error() {
        let result = run_default(unit!(|_| { Err::<(), _>("error occurred".to_string()) })).await;

        match result {
            Err(Error::Unit(e)) => assert_eq!(e, "error occurred"),
            other => panic!("expected unit error, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_returns_without_waiting_for_unit() {
        let start = time::Instant::now();
        let result = run(
            unit!(|_| {
                time::sleep(Duration::from_secs(60)).await;
                Ok::<_, String>(())
            }),
            &Settings::new(Duration::from_secs(1)),
        )
        .await;

        assert!(result.unwrap_err().is_timeout());
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert!(start.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_unit_keeps_running() {
        let finished = Arc::new(AtomicBool::new(false));

        let flag = finished.clone();
        let result = run(
            unit!(|_| {
                time::sleep(Duration::from_secs(2)).await;
                flag.store(true, Ordering::SeqCst);
                Ok::<_, String>(())
            }),
            &Settings::new(Duration::from_secs(1)),
        )
        .await;

        assert!(result.unwrap_err().is_timeout());
        assert!(!finished.load(Ordering::SeqCst));

        time::sleep(Duration::from_secs(2)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn unit_receives_deadline() {
        let result = run(
            unit!(|deadline| {
                time::sleep(deadline.remaining() / 2).await;
                Ok::<_, String>(deadline.remaining())
            }),
            &Settings::new(Duration::from_secs(4)),
        )
        .await;

        let remaining = result.unwrap();
        assert!(remaining <= Duration::from_secs(2));
        assert!(remaining > Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_timeout_does_not_overflow() {
        let result = run(unit!(|_| { Ok::<_, String>(1) }), &Settings::new(Duration::MAX)).await;
        assert_eq!(result.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn synchronous_prologue_is_bounded_by_deadline() {
        let start = std::time::Instant::now();
        let result = run(
            crate::concurrency::unit(|_| {
                std::thread::sleep(Duration::from_millis(500));
                async { Ok::<_, String>(1) }
            }),
            &Settings::new(Duration::from_millis(100)),
        )
        .await;

        assert!(result.unwrap_err().is_timeout());
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn panic_is_reported() {
        let result = run_default(unit!(|_| {
            if true {
                panic!("unit exploded");
            }
            Ok::<u8, String>(0)
        }))
        .await;

        match result {
            Err(Error::Panicked(message)) => assert_eq!(message, "unit exploded"),
            other => panic!("expected panic error, got {:?}", other),
        }
    }
}
