use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use hms_core::{CoreConfig, SessionTable};

/// Main entry point for the HMS access-control server
///
/// Resolves configuration once, builds the role registry and staff directory, and serves the
/// REST API with Swagger UI.
///
/// # Environment Variables
/// - `HMS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `HMS_ROLE_REGISTRY`: Optional YAML role registry replacing the built-in table
/// - `HMS_DEMO_SECRET`: Shared secret accepted for every demo account (default: "password")
/// - `HMS_SESSION_TTL`: Session lifetime in seconds after sign-in (default: 28800)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration or role registry is invalid,
/// - the server address cannot be parsed or bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hms=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("HMS_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;

    // Server sessions live in memory, so there is no session directory to configure.
    let cfg = Arc::new(CoreConfig::from_values(
        None,
        std::env::var("HMS_ROLE_REGISTRY").ok(),
        std::env::var("HMS_DEMO_SECRET").ok(),
        std::env::var("HMS_SESSION_TTL").ok(),
    )?);

    let access = Arc::new(cfg.access_control()?);
    tracing::info!(
        roles = access.registry().iter().count(),
        accounts = access.directory().accounts().len(),
        "access control ready"
    );

    let sessions = SessionTable::new(access, cfg.session_ttl());
    tracing::info!(ttl_secs = sessions.ttl().num_seconds(), "session lifetime");

    let app = api_rest::router(AppState::new(Arc::new(sessions)));

    tracing::info!("++ Starting HMS REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
