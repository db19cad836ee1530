/// Event Service - Main entry point
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use event_service::{
    config::Settings,
    routes,
    services::notify::{Notifier, SmtpChannel},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load()?;
    tracing::info!(
        "Starting event service on {}:{}",
        settings.server.host,
        settings.server.port
    );

    let channel = SmtpChannel::new(&settings.email)?;
    let notifier = Notifier::new(Arc::new(channel));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = AppState::new(settings, notifier);
    let app = routes::router(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
