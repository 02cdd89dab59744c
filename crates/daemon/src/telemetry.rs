//! OpenTelemetry export (optional)
//!
//! # Environment Variables
//!
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (e.g., http://localhost:4317)
//! - `OTEL_SERVICE_NAME`: Service name (default: taskgate-server)
//!
//! ```text
//! OTEL_EXPORTER_OTLP_ENDPOINT=http://localhost:4317 \
//! OTEL_SERVICE_NAME=taskgate-dev \
//!     ./taskgate-server
//! ```

use crate::logging::BoxedLayer;
use anyhow::Result;

const ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
#[cfg(feature = "telemetry")]
const DEFAULT_SERVICE_NAME: &str = "taskgate-server";

/// Tracing layer exporting spans over OTLP, when configured
pub fn layer() -> Result<Option<BoxedLayer>> {
    match std::env::var(ENDPOINT_VAR) {
        Ok(endpoint) => build_layer(&endpoint),
        Err(_) => Ok(None),
    }
}

#[cfg(not(feature = "telemetry"))]
fn build_layer(_endpoint: &str) -> Result<Option<BoxedLayer>> {
    Ok(None)
}

#[cfg(feature = "telemetry")]
fn build_layer(endpoint: &str) -> Result<Option<BoxedLayer>> {
    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());
    otel_layer(endpoint, service_name).map(Some)
}

/// Log what `layer()` decided; called once the subscriber is installed
pub fn log_status() {
    match std::env::var(ENDPOINT_VAR) {
        Err(_) => {
            tracing::debug!("OpenTelemetry not configured ({} not set)", ENDPOINT_VAR);
        }
        Ok(endpoint) if cfg!(feature = "telemetry") => {
            tracing::info!(endpoint = %endpoint, "OpenTelemetry initialized successfully");
        }
        Ok(_) => {
            tracing::warn!("OpenTelemetry endpoint set but feature 'telemetry' not enabled");
            tracing::warn!("Rebuild with: cargo build --features telemetry");
        }
    }
}

/// Flush pending spans
pub fn shutdown() {
    #[cfg(feature = "telemetry")]
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(feature = "telemetry")]
fn otel_layer(endpoint: &str, service_name: String) -> Result<BoxedLayer> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::TracerProvider;
    use opentelemetry_sdk::Resource;
    use tracing_subscriber::Layer;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            service_name.clone(),
        )]))
        .build();

    let tracer = provider.tracer(service_name);
    opentelemetry::global::set_tracer_provider(provider);

    Ok(tracing_opentelemetry::layer().with_tracer(tracer).boxed())
}
