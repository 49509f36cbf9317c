use std::net::Ipv4Addr;

use anyhow::Context;
use log::info;

use khs_crm_backend::config::Config;
use khs_crm_backend::db;
use khs_crm_backend::http;
use khs_crm_backend::http::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::from_env();
    let conn = db::open(&config.database_path)
        .await
        .with_context(|| format!("cannot open database at {}", config.database_path))?;

    let state = AppState::new(conn);
    let app = http::router(state, config.frontend_url.as_deref());

    let listener = tokio::net::TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.port))
        .await
        .with_context(|| format!("cannot bind port {}", config.port))?;
    info!("KHS CRM backend listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
