use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stables_api::auth::seed::seed_demo_users;
use stables_api::background::{sensor_simulation, snapshot_refresh};
use stables_api::config::ServerConfig;
use stables_api::router::build_app_router;
use stables_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stables_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        snapshot_path = %config.snapshot.path.display(),
        "Loaded server configuration"
    );

    // --- App state ---
    let state = AppState::in_memory(config.clone());

    if config.seed_demo_users {
        let created = seed_demo_users(state.users.as_ref())
            .await
            .expect("Failed to seed demo users");
        tracing::info!(created, "Demo users seeded");
    }

    // --- Background tasks ---
    let cancel = CancellationToken::new();

    let simulation_handle = config.simulation.enabled.then(|| {
        tokio::spawn(sensor_simulation::run(
            config.snapshot.path.clone(),
            config.simulation.lots.clone(),
            config.simulation.interval,
            cancel.clone(),
        ))
    });

    let refresh_handle = tokio::spawn(snapshot_refresh::run(
        Arc::clone(&state.snapshots),
        config.snapshot.refresh_interval,
        cancel.clone(),
    ));

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    join_background_task("snapshot_refresh", refresh_handle).await;
    if let Some(handle) = simulation_handle {
        join_background_task("sensor_simulation", handle).await;
    }
    tracing::info!("Background tasks stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait up to 5s for a cancelled background task, logging how it ended.
async fn join_background_task(name: &'static str, handle: JoinHandle<()>) {
    match tokio::time::timeout(Duration::from_secs(5), handle).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(task = name, error = %e, "Background task failed"),
        Err(_) => tracing::warn!(task = name, "Background task did not stop in time"),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
