//! Vidshare API server entry point.

use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use vidshare_api::auth::JwtIdentityResolver;
use vidshare_api::config::Config;
use vidshare_api::error::AppError;
use vidshare_api::routes;
use vidshare_api::state::AppState;
use vidshare_api::telemetry;
use vidshare_core::clock::SystemClock;
use vidshare_core::id::UuidV7Generator;
use vidshare_event_store::pg_event_repository::PgEventRepository;
use vidshare_event_store::pg_view_counter::PgViewCounter;
use vidshare_event_store::timeout::TimeoutRepository;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!(?config, "Starting Vidshare API server");

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.persistence_timeout)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    // Build application state.
    let event_repository = TimeoutRepository::new(
        PgEventRepository::new(pool.clone()),
        config.persistence_timeout,
    );
    let view_counter = TimeoutRepository::new(
        PgViewCounter::new(pool.clone()),
        config.persistence_timeout,
    );
    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(UuidV7Generator),
        Arc::new(event_repository),
        Arc::new(view_counter),
        Arc::new(JwtIdentityResolver::new(config.jwt_secret.as_bytes())),
    );

    // Build router.
    let app = routes::api_router()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config.cors_allowed_origin.as_deref())?)
        .with_state(app_state);

    // Start server.
    let addr = config.bind_address()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down");
    pool.close().await;
    telemetry.shutdown();

    Ok(())
}

fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer, AppError> {
    let Some(origin) = allowed_origin else {
        return Ok(CorsLayer::permissive());
    };
    let origin: HeaderValue = origin
        .parse()
        .map_err(|e| AppError::Config(format!("CORS_ALLOWED_ORIGIN is not a valid origin: {e}")))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
