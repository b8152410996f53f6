//! Web backend for looking up and searching Japanese postal codes.

use eyre::WrapErr;
use postcode_server::config::Config;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().wrap_err("Invalid configuration")?;
    let router = postcode_server::router_from_config(&config)
        .await
        .wrap_err("Failed to build router")?;

    tracing::info!("Starting server at {}", config.server_url);
    let server_addr = TcpListener::bind(config.server_url)
        .await
        .wrap_err("Failed to bind to address")?;
    axum::serve(server_addr, router.into_make_service())
        .await
        .wrap_err("Failed to start server")?;
    Ok(())
}
