use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use backend_infrastructure::{AppConfig, ConfigSource};

#[derive(Parser, Debug)]
#[command(name = "prezo-backend")]
#[command(about = "Weekly event automation backend", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Store backend, `clickhouse` or `memory`
    #[arg(short, long)]
    store: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = args.config {
        std::env::set_var("PREZO_CONFIG", config);
    }
    if let Some(store) = args.store {
        std::env::set_var("PREZO_STORE", store);
    }

    let (config, source) = AppConfig::load().await?;
    let _guard = init_tracing(&config)?;
    match source {
        ConfigSource::File(path) => info!("configuration loaded from {}", path),
        ConfigSource::Defaults(path) => warn!("{} not found, using defaults", path),
    }

    backend_bootstrap::run_standalone(config).await
}

/// The returned guard flushes the log file when dropped.
fn init_tracing(config: &AppConfig) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (writer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "prezo-backend.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);
    let installed = if config.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| anyhow!(err))?;
    Ok(guard)
}
