use tracing::{Level, Span};

use super::TraceId;

/// Root span for one playback session; everything logged under it carries the trace id.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::span!(
        Level::INFO,
        "session",
        name = %name,
        trace_id = %trace_id
    )
}

/// Child span (inherits trace_id from the enclosing root span).
pub fn child_span(name: &'static str) -> Span {
    tracing::span!(Level::INFO, "step", name = %name)
}
