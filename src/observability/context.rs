//! Trace context capture for work that runs outside the current span.
//!
//! Requests are queued by the store and executed later by the worker, so the
//! span that issued them is no longer current when they run. The issuing span
//! is captured into a [`TraceContext`] when the message is built and restored
//! by the worker. The same context is sent to the server as a W3C
//! `traceparent` header.

use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-task span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across tasks.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid, which is the
    /// case whenever tracing has not been initialized.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            let trace_id = format!("{:032x}", span_context.trace_id());
            let parent_span_id = format!("{:016x}", span_context.span_id());

            tracing::trace!(
                trace_id = %trace_id,
                parent_span_id = %parent_span_id,
                "capturing trace context"
            );

            Some(Self {
                trace_id,
                parent_span_id,
            })
        } else {
            None
        }
    }

    /// Makes this context the remote parent of spans created while the guard lives.
    #[must_use]
    pub fn attach(&self) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);
        Some(otel_context.attach())
    }

    /// W3C `traceparent` header value for this context.
    ///
    /// # Example
    ///
    /// ```
    /// use blogline::observability::TraceContext;
    ///
    /// let ctx = TraceContext {
    ///     trace_id: "4bf92f3577b34da6a3ce929d0e0e4736".to_string(),
    ///     parent_span_id: "00f067aa0ba902b7".to_string(),
    /// };
    /// assert_eq!(
    ///     ctx.traceparent(),
    ///     "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"
    /// );
    /// ```
    #[must_use]
    pub fn traceparent(&self) -> String {
        format!("00-{}-{}-01", self.trace_id, self.parent_span_id)
    }
}

/// `traceparent` header value for the current span, if tracing is active.
#[must_use]
pub fn current_traceparent() -> Option<String> {
    TraceContext::from_current().map(|ctx| ctx.traceparent())
}
