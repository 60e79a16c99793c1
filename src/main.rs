use std::net::SocketAddr;

use chatbuddy_backend::{
    config::Config, database::pool::create_pool, database::user_store::UserStore, routes,
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn select_store(config: &Config) -> UserStore {
    let Some(url) = config.database_url.as_deref() else {
        info!("DATABASE_URL not set, keeping accounts in memory");
        return UserStore::in_memory();
    };
    match create_pool(url).await {
        Ok(pool) => {
            info!("connected to Postgres");
            UserStore::postgres(pool)
        }
        Err(e) => {
            tracing::error!(error = ?e, "database unavailable, falling back to in-memory accounts");
            UserStore::in_memory()
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    let users = select_store(&config).await;
    let addr: SocketAddr = config.server_address.parse()?;

    let app_state = AppState::new(config, users)?;
    if !app_state.ai_service.is_configured() {
        tracing::warn!("OPENAI_API_KEY is missing or a placeholder; AI routes will answer 503");
    }

    let app = routes::build_router(app_state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
