use tokio::net::TcpListener;
use todo_server::{ServerConfig, ServerError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = ServerConfig::from_env().inspect_err(|err| {
        tracing::error!(error = %err, "invalid configuration");
    })?;
    let listener = TcpListener::bind(config.addr()).await.inspect_err(|err| {
        tracing::error!(addr = %config.addr(), error = %err, "failed to bind");
    })?;
    todo_server::run(listener, &config).await?;
    Ok(())
}
