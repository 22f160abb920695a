//! Server setup and lifecycle
//!
//! Startup clears open sessions left by a previous process. Shutdown stops
//! accepting requests, drains the voice tracker, then closes every session
//! still open so no connected time is lost.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

use vc_common::{AppConfig, AppError};
use vc_db::{create_pool, default_migrations_dir, run_migrations, PgVoiceStore};
use vc_service::{AccountingService, ServiceContextBuilder};

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(router);
    router.with_state(state)
}

/// Connect to Postgres, apply migrations, and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = vc_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config).await.map_err(AppError::database)?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool, &default_migrations_dir())
            .await
            .map_err(AppError::database)?;
    }

    let service_context = ServiceContextBuilder::new()
        .store(Arc::new(PgVoiceStore::new(pool)))
        .ranking(config.ranking.clone())
        .build()?;

    Ok(AppState::new(service_context, config))
}

/// Resolve on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
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
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C"),
        () = terminate => info!("Received SIGTERM"),
    }
}

/// Serve until `shutdown` resolves, then let in-flight requests finish
pub async fn run_server<F>(app: Router, listener: TcpListener, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().map_err(AppError::internal)?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(AppError::internal)?;

    info!("HTTP server stopped");
    Ok(())
}

/// Run the server until `shutdown` resolves, with startup and shutdown
/// accounting around it
pub async fn run_until<F>(state: AppState, listener: TcpListener, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_app(state.clone());
    serve_with_accounting(state, run_server(app, listener, shutdown)).await
}

/// Clear stale sessions, drive `serve`, then drain the tracker and close
/// every open session.
///
/// The drain also runs when `serve` fails; the serve error is returned
/// after it.
async fn serve_with_accounting<S>(state: AppState, serve: S) -> Result<(), AppError>
where
    S: Future<Output = Result<(), AppError>>,
{
    let startup = state.service_context().startup_time();
    let cleared = AccountingService::new(state.service_context())
        .on_startup()
        .await?;
    info!(startup, cleared, "Voice accounting ready");

    let served = serve.await;
    if let Err(e) = &served {
        error!(error = %e, "HTTP server failed; closing open sessions before exit");
    }

    state.tracker().shutdown().await;
    match AccountingService::new(state.service_context())
        .on_shutdown(startup)
        .await
    {
        Ok(closed) => info!(closed, "Open sessions closed"),
        Err(e) if served.is_ok() => return Err(e.into()),
        Err(e) => error!(error = %e, "Failed to close open sessions"),
    }

    served
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Validation(format!("Invalid API address: {e}")))?;

    let state = create_app_state(config).await?;

    info!("Starting HTTP server on {}", addr);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to bind to {addr}: {e}")))?;

    run_until(state, listener, shutdown_signal()).await
}
