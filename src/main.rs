//! Diagnostic web server entry point.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use simple_webserver::api::{create_router, AppState, NAME, VERSION};
use simple_webserver::config::Config;
use simple_webserver::kube::KubeClient;
use simple_webserver::metrics;
use simple_webserver::storage::{RedisStorage, Storage};
use simple_webserver::utils::shutdown_signal;

/// Minimal diagnostic web server with a Redis health probe.
#[derive(Parser, Debug)]
#[command(name = "simple-webserver")]
#[command(about = "Diagnostic HTTP server with a Redis-backed /ping probe")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Address + port to listen on. Format host:port.
    #[arg(long, global = true, env = "SIMPLE_WEBSERVER_LISTEN")]
    listen: Option<String>,

    /// Address + port where a Redis server is listening.
    #[arg(long, global = true, env = "SIMPLE_WEBSERVER_REDIS")]
    redis: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,

    /// Probe the storage backend once and print the reply.
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration; --listen/--redis (or their env vars) take precedence
    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(listen) = args.listen {
        config.listen = listen;
    }
    if let Some(redis) = args.redis {
        config.redis = redis;
    }

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("simple_webserver=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    // Initialize metrics
    metrics::init_metrics();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Ping) => cmd_ping(&config).await,
        Some(Command::Serve) | None => cmd_serve(config).await,
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("{} v{} - CONFIGURATION CHECK", NAME, VERSION);
    println!("======================================================================");

    print!("Validating configuration... ");
    if let Err(e) = config.validate() {
        println!("FAILED");
        println!("  Error: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed"));
    }
    println!("OK");

    print!("Resolving Redis address... ");
    let storage = match RedisStorage::new(&config.redis, config.redis_timeout()) {
        Ok(storage) => {
            println!("OK");
            storage
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Redis address invalid"));
        }
    };

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Listen: {}", config.listen_addr()?);
    println!("  Redis: {}", storage.url());
    println!("  Redis Timeout: {}ms", config.redis_timeout_ms);
    println!("  Max Payload: {} bytes", config.max_payload_bytes);
    println!("  Kube API: {}", config.kube_api_url);
    println!("  Kube Namespace: {}", config.kube_namespace);
    println!("  Kube Pod Image: {}", config.kube_pod_image);
    println!(
        "  Metrics: {}",
        config.metrics_listen.as_deref().unwrap_or("Disabled")
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Probe the storage backend once.
async fn cmd_ping(config: &Config) -> anyhow::Result<()> {
    let storage = RedisStorage::new(&config.redis, config.redis_timeout())?;
    info!("Probing Redis at {}", storage.url());

    let reply = storage.ping().await.map_err(|e| {
        error!("Redis probe failed: {}", e);
        e
    })?;
    println!("{}", reply);

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if let Some(addr) = config.metrics_addr()? {
        metrics::install_exporter(addr).context("failed to start metrics exporter")?;
    }

    // Create Redis storage
    let storage = RedisStorage::new(&config.redis, config.redis_timeout())?;
    info!("Using Redis at {}", storage.url());

    let pods = KubeClient::new(&config)?;
    info!("Pods will be created at {}", pods.pods_url());

    let state = AppState::new(Arc::new(storage), Arc::new(pods))
        .with_max_payload_bytes(config.max_payload_bytes);

    // Start HTTP server
    let addr = config.listen_addr()?;
    let listener = TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Starting webserver and listen on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Webserver stopped");
    Ok(())
}
