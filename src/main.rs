//! Server binary: provision the database, seed empty tables, serve `/api`.

use dev_tracker::{
    ensure_database_exists, ensure_tables, router, seed_all, AppState, PgStore, Settings, CONFIG_FILE,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_file = dotenvy::from_filename(CONFIG_FILE);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dev_tracker=info,tower_http=info")),
        )
        .init();
    match env_file {
        Ok(path) => tracing::info!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => tracing::info!("no {} file found, using defaults", CONFIG_FILE),
        Err(e) => tracing::warn!(error = %e, "could not read {}", CONFIG_FILE),
    }

    let settings = Settings::from_env()?;
    tracing::info!(?settings, "starting");

    ensure_database_exists(&settings.database).await;
    let store = PgStore::connect(&settings.database).await?;
    tracing::info!(database = %settings.database.name, "connected");
    ensure_tables(store.pool()).await?;
    seed_all(&store).await;

    let app = router(AppState::new(store.clone()), settings.body_limit);
    let listener = TcpListener::bind(("0.0.0.0", settings.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("pool closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "could not listen for ctrl-c");
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
                tracing::warn!(error = %e, "could not listen for SIGTERM");
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
    tracing::info!("shutdown signal received");
}
