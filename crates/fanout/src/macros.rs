/// Convenience macro to create a [`WorkUnit`](crate::concurrency::WorkUnit). It wraps the given
/// block into an async block and moves the environment into it. The bound identifier is the
/// [`Deadline`](crate::concurrency::Deadline) of the execution.
/// Example
/// ```rust
/// use fanout::unit;
///
/// let a = unit!(|_| { Ok::<_, String>(1) });
/// let b = unit!(|deadline| {
///     tokio::time::sleep(deadline.remaining() / 2).await;
///     Ok::<_, String>(2)
/// });
/// ```
#[macro_export]
macro_rules! unit {
    (|$n: ident| $e: block) => {
        $crate::concurrency::unit(move |$n| async move $e)
    };
    (|_| $e: block) => {
        $crate::concurrency::unit(move |_| async move $e)
    };
}

#[macro_export]
macro_rules! measure_duration {
    ($e: expr) => {{
        let now = std::time::Instant::now();

        let result = $e;
        (result, now.elapsed())
    }};
}

/// Emit a measurement as a tracing event. Subscribers exporting metrics pick them up
/// by their `counter.`, `monotonic_counter.` or `histogram.` prefix.
#[macro_export]
macro_rules! metric {
    (counter [ $label: ident ] = $i: expr $(,$field: ident = $value: expr)*) => {
        $crate::tracing::debug!(monotonic_counter.$label = $i, $($field = $value),*)
    };
    (histogram [ $label: ident ] = $i: expr $(,$field: ident = $value: expr)*) => {
        $crate::tracing::debug!(histogram.$label = $i as f64, $($field = $value),*)
    };
}
