// SPDX-License-Identifier: Apache-2.0
#![forbid(unsafe_code)]

use gigboard_geo::SuburbAtlas;
use gigboard_server::{auth, build_router, AppState, ServerConfig};
use gigboard_store::{create_schema, open_file, open_memory, seed_reference_data};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = tokio::signal::ctrl_c() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let mut config = ServerConfig::from_env();
    init_tracing(config.log_json);

    if config.session_secret.is_empty() {
        warn!("GIGBOARD_SESSION_SECRET not set; sessions will not survive a restart");
        config.session_secret = auth::random_secret();
    }

    let mut conn = match &config.db_path {
        Some(path) => open_file(path).map_err(|e| format!("open database failed: {e}"))?,
        None => {
            warn!("GIGBOARD_DB not set; running on an in-memory database");
            open_memory().map_err(|e| format!("open database failed: {e}"))?
        }
    };
    create_schema(&conn).map_err(|e| format!("schema creation failed: {e}"))?;
    seed_reference_data(&mut conn).map_err(|e| format!("reference data seeding failed: {e}"))?;

    let mut atlas = SuburbAtlas::empty();
    for source in &config.suburb_sources {
        atlas
            .load_file(&source.path, &source.zip_key)
            .map_err(|e| format!("suburb source {} failed: {e}", source.path.display()))?;
    }
    if atlas.is_empty() {
        warn!("no suburb boundaries loaded; gig maps will use fallback views");
    }

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(conn, atlas, config);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!("gigboard-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}
