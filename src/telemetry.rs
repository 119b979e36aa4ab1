//! Tracing setup for the console binary
//!
//! Installs the `fmt` subscriber filtered by `RUST_LOG` and, when
//! `OTEL_EXPORTER_OTLP_ENDPOINT` is set, an OTLP export layer.

use std::env;

use opentelemetry::trace::TraceError;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    propagation::TraceContextPropagator,
    runtime,
    trace::{self, Sampler},
    Resource,
};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, registry::LookupSpan, EnvFilter, Layer};

pub const SERVICE_NAME: &str = "dao-console";

/// Endpoint the OTLP exporter should use, if export is enabled.
pub fn otlp_endpoint() -> Option<String> {
    env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .ok()
        .filter(|endpoint| !endpoint.trim().is_empty())
}

/// Build the OpenTelemetry layer exporting to `endpoint`.
pub fn init_telemetry<S>(
    _subscriber: &S,
    endpoint: &str,
) -> Result<Box<dyn Layer<S> + Send + Sync>, TraceError>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a> + Send + Sync,
{
    global::set_text_map_propagator(TraceContextPropagator::new());

    if endpoint.starts_with("http://")
        && !endpoint.contains("localhost")
        && !endpoint.contains("127.0.0.1")
        && !endpoint.contains("::1")
    {
        warn!("Unencrypted telemetry endpoint detected for remote host {}", endpoint);
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SERVICE_NAME),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);

    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint);

    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(
            trace::config()
                .with_resource(resource)
                .with_sampler(Sampler::AlwaysOn),
        )
        .install_batch(runtime::Tokio)?;

    Ok(tracing_opentelemetry::layer().with_tracer(tracer).boxed())
}

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays machine-readable.
pub fn init_tracing(json: bool) -> Result<(), TraceError> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let fmt_layer = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let registry = tracing_subscriber::registry().with(env_filter).with(fmt_layer);

    match otlp_endpoint() {
        Some(endpoint) => {
            let otel_layer = init_telemetry(&registry, &endpoint)?;
            registry.with(otel_layer).init();
            info!("OpenTelemetry tracing initialized");
        }
        None => {
            registry.init();
            info!("OpenTelemetry tracing disabled (OTEL_EXPORTER_OTLP_ENDPOINT not set)");
        }
    }
    Ok(())
}

/// Flush and shut down the exporter, if one was installed.
pub fn shutdown_telemetry() {
    global::shutdown_tracer_provider();
}
