use claim_wise_service::{AppState, Config, LogFormat, build_router};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured JSON tracing, or human-readable output with `LOG_FORMAT=pretty`
fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "claim_wise_service=debug,claim_wise=debug,tower_http=debug".into()
    });

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let app_state = AppState::from_config(&config);

    // The flag is read once at startup to pick the first view.
    match app_state.session.current_view().await {
        Ok(view) => info!(view = ?view, "Initial view"),
        Err(e) => error!(error = %e, "Failed to read session flag"),
    }

    let app = build_router(app_state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("Server running on http://{}", addr);
    info!(
        prediction_delay_ms = config.prediction_delay.as_millis() as u64,
        claims_csv = %config.claims_csv_path.display(),
        "Claim analysis ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
