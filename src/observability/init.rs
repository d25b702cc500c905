//! Tracing subscriber setup.

use super::tracer;
use crate::infrastructure::paths;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "blogline";

/// Installs the global subscriber exporting spans to the trace file.
///
/// The filter comes from `RUST_LOG` when set, else from `config.trace_level`,
/// else `info`. Traces go to `blogline.log` in the configured data directory,
/// which is created if missing.
///
/// Tracing is optional: if the directory cannot be created nothing is
/// installed. Calling this more than once keeps the first subscriber.
///
/// # Example
///
/// ```no_run
/// use blogline::observability::init_tracing;
/// use blogline::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if std::fs::create_dir_all(&config.data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![
        opentelemetry::KeyValue::new("service.name", SERVICE_NAME),
        opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = tracer::create_tracer_provider(
        paths::trace_file(&config.data_dir),
        resource,
        SERVICE_NAME,
    );
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init();
}
