use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use tracing::{info, warn};

use sphere_api::middleware::rate_limit::CLEANUP_INTERVAL;
use sphere_api::{build_router, AppState};
use sphere_infrastructure::build_repositories;
use sphere_shared::config::AppConfig;
use sphere_shared::i18n::set_locale;
use sphere_shared::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Configuration comes first so telemetry can honour its log settings
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_telemetry(&config.log)?;

    info!(
        name = %config.app.name,
        env = %config.app.env,
        locale = config.app.locale.as_str(),
        "Sphere server starting"
    );
    set_locale(config.app.locale);

    let repos = build_repositories(&config.database)
        .await
        .context("preparing storage")?;

    let host: IpAddr = config.app.host.parse().context("parsing app.host")?;
    let addr = SocketAddr::from((host, config.app.port));

    let state = AppState::new(config, repos);
    // Prune idle rate-limit entries for the life of the process
    let _limiter_cleanup = state.limiter.spawn_cleanup(CLEANUP_INTERVAL);
    let app = build_router(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Sphere server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
