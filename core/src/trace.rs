//! Tracing utilities for query and foreign-key observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level tracing event with the SQL text and parameter count.
///
/// ```ignore
/// typeq_trace_query!(&sql_str, params.len());
/// ```
#[macro_export]
macro_rules! typeq_trace_query {
    ($sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %$sql, params = $param_count, "typeq.query");
    };
}

/// Emit a trace-level event when a foreign-key cell resolves lazily.
///
/// ```ignore
/// typeq_trace_resolve!("company");
/// ```
#[macro_export]
macro_rules! typeq_trace_resolve {
    ($table:expr) => {
        #[cfg(feature = "tracing")]
        tracing::trace!(table = %$table, "typeq.resolve");
    };
}

/// Emit a debug-level event for an insert or update.
#[macro_export]
macro_rules! typeq_trace_modify {
    ($statement:literal, $table:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(statement = $statement, table = %$table, "typeq.modify");
    };
}
