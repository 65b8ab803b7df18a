use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use notakers::config::{Cli, Config};
use notakers::inference::model_loader::load_model;
use notakers::server::api::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "notakers=debug,tower_http=debug"
    } else {
        "notakers=info,tower_http=info"
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_target(true);

    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!("notakers v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration.
    let mut config = Config::load(&cli.config)?;
    config.apply_cli(&cli);

    info!(
        listen = config.server.listen,
        data_file = %config.storage.data_file.display(),
        pipeline = ?config.notes.pipeline,
        backend = ?config.model.backend,
        "Configuration loaded"
    );

    let model = load_model(&config.model).await?;
    let state = Arc::new(AppState::new(&config, model).await?);

    let app = build_router(
        state,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let listener = TcpListener::bind(&config.server.listen).await?;
    info!("Listening on {}", config.server.listen);

    axum::serve(listener, app).await?;

    Ok(())
}
