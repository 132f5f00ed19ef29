use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;
use kalima_api::{start_server_with_config, ApiConfig};
use kalima_core::LookupConfig;
use kalima_storage::{SeedOptions, Storage};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "kalima-server", about = "Kalima dictionary server")]
struct Cli {
    /// HTTP listening address
    #[arg(long, env = "KALIMA_ADDR", default_value = "0.0.0.0:8080")]
    addr: SocketAddr,

    /// Seed document with words, verb forms and examples
    #[arg(long, env = "KALIMA_SEED_PATH", default_value = "./data/seed.json")]
    seed: PathBuf,

    /// Refuse to start when stored normalized headwords disagree with the normalizer
    #[arg(long, env = "KALIMA_STRICT_SEED")]
    strict_seed: bool,

    /// Maximum entries returned by search and lookup
    #[arg(long, env = "KALIMA_SEARCH_LIMIT", default_value_t = 20)]
    search_limit: usize,

    /// Maximum autocomplete suggestions, capped at 10
    #[arg(long, env = "KALIMA_SUGGEST_LIMIT", default_value_t = 2)]
    suggest_limit: usize,

    /// Allowed CORS origin; any origin when unset
    #[arg(long, env = "KALIMA_CORS_ORIGIN")]
    cors_origin: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_observability()?;

    let cli = Cli::parse();
    info!(seed = ?cli.seed, "starting kalima server");

    let options = if cli.strict_seed {
        SeedOptions::strict()
    } else {
        SeedOptions::default()
    };
    let storage = Storage::open_with(&cli.seed, options)
        .with_context(|| format!("failed to load seed {}", cli.seed.display()))?;

    let lookup = LookupConfig::default()
        .with_search_limit(cli.search_limit)
        .with_suggest_limit(cli.suggest_limit);
    if lookup.suggest_limit != cli.suggest_limit {
        warn!(
            requested = cli.suggest_limit,
            applied = lookup.suggest_limit,
            "suggest limit clamped"
        );
    }
    let cors_origin = cli
        .cors_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()
        .context("invalid CORS origin")?;
    let config = ApiConfig {
        lookup,
        cors_origin,
    };

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("shutdown signal received");
    };

    let listener = tokio::net::TcpListener::bind(cli.addr).await?;
    info!("listening on http://{}", cli.addr);
    start_server_with_config(listener, storage, config, shutdown)
        .await
        .await??;

    info!("server stopped");
    Ok(())
}

fn init_observability() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .json();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,kalima_api=debug,kalima_storage=debug".into());

    let registry = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter);

    if std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok() {
        use opentelemetry::KeyValue;
        use opentelemetry_sdk::{trace as sdktrace, Resource};

        let tracer = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(opentelemetry_otlp::new_exporter().tonic())
            .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
                KeyValue::new("service.name", "kalima-server"),
            ])))
            .install_batch(opentelemetry_sdk::runtime::Tokio)
            .context("failed to install OpenTelemetry tracer")?;

        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
        registry.with(otel_layer).try_init()?;
        info!("OpenTelemetry tracing initialized");
    } else {
        registry.try_init()?;
    }
    Ok(())
}
