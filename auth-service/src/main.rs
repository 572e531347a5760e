use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth_service::{config::Config, routes, AppState};
use token_codec::TokenCodec;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let codec = TokenCodec::from_base64_pem(
        &config.access_token_private_key,
        &config.access_token_public_key,
        &config.refresh_token_private_key,
        &config.refresh_token_public_key,
    )?;

    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!().run(&db).await?;
    tracing::info!("database migrations applied");

    let addr = format!("{}:{}", config.server_host, config.server_port);

    let state = AppState {
        db,
        codec: Arc::new(codec),
        config: Arc::new(config),
    };

    let router = routes::build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "auth service listening");

    axum::serve(listener, router).await?;

    Ok(())
}
