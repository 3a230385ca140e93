#![forbid(unsafe_code)]

use std::env;

use notehive_server::{build_router, ApiConfig, AppState, TokenSigner};
use notehive_store::Store;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEV_TOKEN_SECRET: &str = "notehive-dev-secret";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(notehive_core::ENV_NOTEHIVE_LOG)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let log_json = env::var("NOTEHIVE_LOG_JSON").map_or(false, |v| v == "1" || v == "true");
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
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("NOTEHIVE_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let db_path = env::var("NOTEHIVE_DB_PATH").unwrap_or_else(|_| "notehive.sqlite".to_string());
    let secret = env::var("NOTEHIVE_TOKEN_SECRET").unwrap_or_else(|_| {
        warn!("NOTEHIVE_TOKEN_SECRET is not set; using the development secret");
        DEV_TOKEN_SECRET.to_string()
    });

    let api_cfg = ApiConfig::from_env();
    let store = Store::open(&db_path).map_err(|e| format!("open store at {db_path}: {e}"))?;
    let tokens = TokenSigner::new(secret, api_cfg.token_ttl_secs);
    let state = AppState::new(store, api_cfg, tokens);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!("notehive-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}
