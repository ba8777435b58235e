//! Conditional tracing macros.
//!
//! With the `tracing` feature these forward to `tracing`; without it they
//! only evaluate their field values, so search hot paths carry no logging
//! cost.

/// Create an info-level span around a search phase or batch.
///
/// Without the `tracing` feature the field values are still evaluated and
/// then discarded.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $key:ident = $value:expr)* $(,)?) => {{
        let _ = ($(&$value,)*);
        $crate::trace::NoopSpan
    }};
}

/// Emit an info-level event with phase results or per-tile outcomes.
///
/// Without the `tracing` feature the field values are still evaluated and
/// then discarded.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::info!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Stand-in span guard when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Mirrors `Span::entered()`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}

#[cfg(all(test, not(feature = "tracing")))]
mod tests {
    use std::cell::Cell;

    #[test]
    fn disabled_macros_still_evaluate_field_values() {
        let calls = Cell::new(0usize);
        let bump = || {
            calls.set(calls.get() + 1);
            calls.get()
        };

        let _span = trace_span!("span", first = bump(), second = bump()).entered();
        trace_event!("event", third = bump());
        assert_eq!(calls.get(), 3);
    }
}
