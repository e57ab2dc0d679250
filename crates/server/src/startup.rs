use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tracing::info;

use crate::routes;
use service::{
    blessing::{store::BlessingStore, WallPolicy},
    file::blessing_wall::BlessingWall,
    runtime,
};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8081);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Storage knobs from config, falling back to compiled defaults when no
/// config file is present.
fn load_storage_config() -> anyhow::Result<configs::StorageConfig> {
    let mut storage = configs::load_default().map(|cfg| cfg.storage).unwrap_or_default();
    storage.normalize_and_validate()?;
    Ok(storage)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let storage = load_storage_config()?;
    runtime::ensure_env("frontend", &storage.data_dir).await?;

    let policy = WallPolicy {
        max_records: storage.max_records,
        max_name_chars: storage.max_name_chars,
        max_blessing_chars: storage.max_blessing_chars,
    };
    let wall = BlessingWall::new(storage.blessings_path(), policy)
        .await
        .map_err(|e| anyhow::anyhow!("cannot open blessing store: {e}"))?;
    let store: Arc<dyn BlessingStore> = wall;

    // Build router
    let cors = routes::build_cors();
    let app: Router = routes::build_router(store, cors);

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, cap = policy.max_records, "starting blessing board server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
