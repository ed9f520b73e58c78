mod batch;
mod deadline;
mod outcome;
mod single;

use std::any::Any;
use std::future::Future;

pub use batch::{run_all, run_all_default, run_all_with, Batch};
pub use deadline::Deadline;
use futures_core::future::BoxFuture;
pub use outcome::Outcomes;
pub use single::{run, run_default, run_with};
use thiserror::Error;
use tokio::task::JoinError;

/// A unit of work: a one-shot operation producing either a value or an error. The
/// [`Deadline`] it receives can be used to stop early, see [`Deadline`].
///
/// Executors invoke the unit on its own task, so both the closure and the future it
/// returns run under the deadline. Units are built with [`unit`] or [`blocking`].
pub type WorkUnit<T, E> = Box<dyn FnOnce(Deadline) -> BoxFuture<'static, Result<T, Error<E>>> + Send>;

#[derive(Error, Debug)]
pub enum Error<E> {
    /// Error reported by the unit itself, passed through verbatim
    #[error("{0}")]
    Unit(E),

    /// The deadline elapsed before the unit reported an outcome
    #[error("operation timed out")]
    Timeout,

    /// The unit panicked or its task was cancelled by the runtime
    #[error("unit panicked: {0}")]
    Panicked(String),
}

impl<E> Error<E> {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout)
    }

    pub fn as_unit(&self) -> Option<&E> {
        match self {
            Error::Unit(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_unit(self) -> Option<E> {
        match self {
            Error::Unit(e) => Some(e),
            _ => None,
        }
    }
}

impl<E> From<JoinError> for Error<E> {
    fn from(value: JoinError) -> Self {
        if value.is_panic() {
            let payload = value.into_panic();
            Error::Panicked(panic_message(&*payload))
        } else {
            Error::Panicked(value.to_string())
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Build a [`WorkUnit`] out of an async closure. The macro [`unit!`](crate::unit) is a
/// shorter way to write the same thing.
pub fn unit<T, E, F, Fut>(f: F) -> WorkUnit<T, E>
where
    F: 'static + Send + FnOnce(Deadline) -> Fut,
    Fut: 'static + Send + Future<Output = Result<T, E>>,
    T: 'static + Send,
    E: 'static + Send,
{
    Box::new(move |deadline: Deadline| -> BoxFuture<'static, Result<T, Error<E>>> {
        let future = f(deadline);
        Box::pin(async move { future.await.map_err(Error::Unit) })
    })
}

/// Build a [`WorkUnit`] out of a blocking closure. The closure runs on the blocking
/// thread pool so it cannot starve the runtime; it never sees the deadline.
pub fn blocking<T, E, F>(f: F) -> WorkUnit<T, E>
where
    F: 'static + Send + FnOnce() -> Result<T, E>,
    T: 'static + Send,
    E: 'static + Send,
{
    Box::new(move |_: Deadline| -> BoxFuture<'static, Result<T, Error<E>>> {
        Box::pin(async move {
            match tokio::task::spawn_blocking(f).await {
                Ok(result) => result.map_err(Error::Unit),
                Err(e) => Err(Error::from(e)),
            }
        })
    })
}
