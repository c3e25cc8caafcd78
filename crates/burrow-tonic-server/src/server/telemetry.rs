//! # Telemetry
//!
//! Console logging is always on. OpenTelemetry export is opt-in through
//! features:
//!
//! - `tracing`: export spans.
//! - `metrics`: export request counters and factory gauges.
//! - `stdout`: print exported spans and metrics to stdout.
//! - `otlp`: ship them to an OTLP collector over gRPC. The endpoint and
//!   headers come from the standard `OTEL_EXPORTER_OTLP_*` variables.
//!
//! Exporters need at least one of `tracing` or `metrics`:
//!
//! ```bash
//! cargo run --features tracing,metrics,otlp
//! ```

#[cfg(all(feature = "otlp", not(any(feature = "tracing", feature = "metrics"))))]
compile_error!("The 'otlp' feature requires at least one of 'tracing' or 'metrics' to be enabled.");

#[cfg(all(feature = "stdout", not(any(feature = "tracing", feature = "metrics"))))]
compile_error!(
    "The 'stdout' feature requires at least one of 'tracing' or 'metrics' to be enabled."
);

use burrow_tonic_core::burrow::Factory;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(all(feature = "otlp", any(feature = "metrics", feature = "tracing")))]
use opentelemetry_otlp::{Protocol, WithExportConfig};

#[cfg(feature = "metrics")]
use opentelemetry::metrics::{Counter, Meter, ObservableCounter, ObservableGauge};
#[cfg(feature = "metrics")]
use opentelemetry_sdk::metrics as sdkmetrics;
#[cfg(feature = "metrics")]
use std::sync::OnceLock;

#[cfg(any(feature = "metrics", feature = "tracing"))]
use opentelemetry::{InstrumentationScope, KeyValue};
#[cfg(any(feature = "metrics", feature = "tracing"))]
use opentelemetry_sdk::Resource;
#[cfg(any(feature = "metrics", feature = "tracing"))]
use opentelemetry_semantic_conventions as semvcns;

#[cfg(feature = "tracing")]
use opentelemetry::trace::TracerProvider;
#[cfg(feature = "tracing")]
use opentelemetry_sdk::propagation::TraceContextPropagator;
#[cfg(feature = "tracing")]
use opentelemetry_sdk::trace as sdktrace;

const SERVICE_NAME: &str = "burrow";

pub struct TelemetryProviders {
    #[cfg(feature = "tracing")]
    pub tracer_provider: sdktrace::SdkTracerProvider,
    #[cfg(feature = "metrics")]
    pub meter_provider: sdkmetrics::SdkMeterProvider,
}

impl TelemetryProviders {
    /// Flushes pending spans and metrics and shuts the providers down.
    pub fn shutdown(&self) {
        #[cfg(feature = "tracing")]
        {
            if let Err(err) = self.tracer_provider.force_flush() {
                eprintln!("Error flushing traces: {err:#?}");
            }
            if let Err(err) = self.tracer_provider.shutdown() {
                eprintln!("Error shutting down tracer: {err:#?}");
            }
        }

        #[cfg(feature = "metrics")]
        {
            if let Err(err) = self.meter_provider.force_flush() {
                eprintln!("Error flushing metrics: {err:#?}");
            }
            if let Err(err) = self.meter_provider.shutdown() {
                eprintln!("Error shutting down meter: {err:#?}");
            }
        }
    }
}

pub fn init_telemetry() -> anyhow::Result<TelemetryProviders> {
    #[cfg(feature = "tracing")]
    opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());

    #[cfg(feature = "tracing")]
    let tracer_provider = init_tracer()?;

    #[cfg(feature = "metrics")]
    let meter_provider = init_metrics()?;

    #[cfg(any(feature = "metrics", feature = "tracing"))]
    let scope = InstrumentationScope::builder(SERVICE_NAME)
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_schema_url(semvcns::SCHEMA_URL)
        .build();

    // Human-readable console output, independent of the stdout exporter.
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true)
                .pretty(),
        );

    #[cfg(feature = "tracing")]
    let registry = {
        opentelemetry::global::set_tracer_provider(tracer_provider.clone());
        registry.with(
            tracing_opentelemetry::layer()
                .with_tracer(tracer_provider.tracer_with_scope(scope.clone()))
                .with_error_records_to_exceptions(true),
        )
    };

    #[cfg(feature = "metrics")]
    let registry = {
        opentelemetry::global::set_meter_provider(meter_provider.clone());
        let meter = opentelemetry::global::meter_with_scope(scope);
        init_metric_handles(meter);

        registry.with(tracing_opentelemetry::MetricsLayer::new(
            meter_provider.clone(),
        ))
    };

    registry.init();

    Ok(TelemetryProviders {
        #[cfg(feature = "tracing")]
        tracer_provider,
        #[cfg(feature = "metrics")]
        meter_provider,
    })
}

#[cfg(any(feature = "metrics", feature = "tracing"))]
fn resource() -> Resource {
    Resource::builder()
        .with_service_name(SERVICE_NAME)
        .with_schema_url(
            [KeyValue::new(
                semvcns::resource::SERVICE_VERSION,
                env!("CARGO_PKG_VERSION"),
            )],
            semvcns::SCHEMA_URL,
        )
        .build()
}

#[cfg(feature = "metrics")]
fn init_metrics() -> anyhow::Result<sdkmetrics::SdkMeterProvider> {
    let builder = sdkmetrics::SdkMeterProvider::builder().with_resource(resource());

    #[cfg(feature = "stdout")]
    let builder = {
        let exporter = opentelemetry_stdout::MetricExporter::default();
        let reader = sdkmetrics::PeriodicReader::builder(exporter)
            .with_interval(std::time::Duration::from_secs(5))
            .build();
        builder.with_reader(reader)
    };

    #[cfg(feature = "otlp")]
    let builder = {
        use anyhow::Context;

        let exporter = opentelemetry_otlp::MetricExporter::builder()
            .with_tonic()
            .with_protocol(Protocol::Grpc)
            .with_timeout(std::time::Duration::from_secs(10))
            .build()
            .context("failed to build metrics exporter")?;
        builder.with_periodic_exporter(exporter)
    };

    Ok(builder.build())
}

#[cfg(feature = "tracing")]
fn init_tracer() -> anyhow::Result<sdktrace::SdkTracerProvider> {
    let builder = sdktrace::SdkTracerProvider::builder().with_resource(resource());

    #[cfg(feature = "stdout")]
    let builder = builder.with_span_processor(batch_processor(
        opentelemetry_stdout::SpanExporter::default(),
    ));

    #[cfg(feature = "otlp")]
    let builder = {
        use anyhow::Context;

        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_protocol(Protocol::Grpc)
            .with_timeout(std::time::Duration::from_secs(10))
            .build()
            .context("failed to build tracer exporter")?;
        builder.with_span_processor(batch_processor(exporter))
    };

    Ok(builder.build())
}

#[cfg(all(feature = "tracing", any(feature = "stdout", feature = "otlp")))]
fn batch_processor<E>(exporter: E) -> sdktrace::BatchSpanProcessor
where
    E: opentelemetry_sdk::trace::SpanExporter + 'static,
{
    sdktrace::BatchSpanProcessor::builder(exporter)
        .with_batch_config(
            sdktrace::BatchConfigBuilder::default()
                .with_scheduled_delay(std::time::Duration::from_secs(5))
                .with_max_queue_size(2048)
                .build(),
        )
        .build()
}

#[cfg(feature = "metrics")]
static METER: OnceLock<Meter> = OnceLock::new();
#[cfg(feature = "metrics")]
static ALLOCATIONS: OnceLock<Counter<u64>> = OnceLock::new();
#[cfg(feature = "metrics")]
static POOL_EXHAUSTED: OnceLock<Counter<u64>> = OnceLock::new();
#[cfg(feature = "metrics")]
static FACTORY_INSTRUMENTS: OnceLock<FactoryInstruments> = OnceLock::new();

/// Observable instruments read from [`Factory::stats`] at collection time.
#[cfg(feature = "metrics")]
struct FactoryInstruments {
    _buckets_filled: ObservableCounter<u64>,
    _fills_aborted: ObservableCounter<u64>,
    _candidates_rejected: ObservableCounter<u64>,
    _full_buckets: ObservableGauge<u64>,
}

#[cfg(feature = "metrics")]
fn init_metric_handles(meter: Meter) {
    let _ = ALLOCATIONS.set(
        meter
            .u64_counter("allocations")
            .with_description("Batches handed out")
            .build(),
    );

    let _ = POOL_EXHAUSTED.set(
        meter
            .u64_counter("pool_exhausted")
            .with_description("Allocate calls that found no full bucket")
            .build(),
    );

    let _ = METER.set(meter);
}

/// Exports the factory's fill counters and pool occupancy.
#[cfg(feature = "metrics")]
pub fn observe_factory(factory: Arc<Factory>) {
    let Some(meter) = METER.get() else {
        return;
    };

    let f = Arc::clone(&factory);
    let buckets_filled = meter
        .u64_observable_counter("buckets_filled")
        .with_description("Buckets published as full")
        .with_callback(move |observer| observer.observe(f.stats().buckets_filled, &[]))
        .build();

    let f = Arc::clone(&factory);
    let fills_aborted = meter
        .u64_observable_counter("fills_aborted")
        .with_description("Fills that gave up and left their bucket busy")
        .with_callback(move |observer| observer.observe(f.stats().fills_aborted, &[]))
        .build();

    let f = Arc::clone(&factory);
    let candidates_rejected = meter
        .u64_observable_counter("candidates_rejected")
        .with_description("Candidates discarded by the membership filter")
        .with_callback(move |observer| observer.observe(f.stats().candidates_rejected, &[]))
        .build();

    let full_buckets = meter
        .u64_observable_gauge("full_buckets")
        .with_description("Buckets ready to be handed out")
        .with_callback(move |observer| observer.observe(factory.pool().stats().full as u64, &[]))
        .build();

    let _ = FACTORY_INSTRUMENTS.set(FactoryInstruments {
        _buckets_filled: buckets_filled,
        _fills_aborted: fills_aborted,
        _candidates_rejected: candidates_rejected,
        _full_buckets: full_buckets,
    });
}

#[cfg(not(feature = "metrics"))]
pub fn observe_factory(_factory: Arc<Factory>) {}

#[cfg(feature = "metrics")]
pub fn increment_allocations() {
    if let Some(counter) = ALLOCATIONS.get() {
        counter.add(1, &[]);
    }
}

#[cfg(not(feature = "metrics"))]
pub fn increment_allocations() {}

#[cfg(feature = "metrics")]
pub fn increment_pool_exhausted() {
    if let Some(counter) = POOL_EXHAUSTED.get() {
        counter.add(1, &[]);
    }
}

#[cfg(not(feature = "metrics"))]
pub fn increment_pool_exhausted() {}
