// Main entry point for the resource API server

use anyhow::{Context, Result};
use server_core::{kernel::CmsClient, kernel::ServerDeps, server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting roofing archive resource API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        cms = %config.cms_graphql_url,
        upstream_timeout = ?config.upstream_timeout,
        rate_limit = ?config.rate_limit_per_second,
        "Configuration loaded"
    );

    // Content sources all share one CMS client
    let cms = CmsClient::new(config.cms_graphql_url.clone(), config.upstream_timeout)
        .context("Failed to create CMS client")?
        .with_token(config.cms_auth_token.clone());

    // Build application
    let app = build_app(ServerDeps::from_cms(cms), config.app_options());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
