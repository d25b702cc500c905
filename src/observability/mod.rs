//! OpenTelemetry-based tracing with file export.
//!
//! ```text
//! tracing spans → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → blogline.log
//! ```
//!
//! - Spans are written as OTLP JSON, one batch per line
//! - The file rotates at 10 MB, keeping 3 backups
//! - Requests carry the issuing span to the worker and, as a `traceparent`
//!   header, to the server
//!
//! The filter is taken from `RUST_LOG`, then from `trace_level` in the
//! configuration, then defaults to `info`.
//!
//! # Modules
//!
//! - `context`: trace context capture and restore across the request queue
//! - `init`: subscriber setup
//! - `tracer`: tracer provider with file export
//! - `span_formatter`: OTLP JSON encoding
//! - `file_writer`: rotating file writer

mod context;
mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use context::{current_traceparent, TraceContext};
pub use init::init_tracing;
