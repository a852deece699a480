//! Lesson engine HTTP server.

use std::error::Error;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use lesson_engine::adapters::http::{api_router, ApiState};
use lesson_engine::adapters::{
    InMemoryRosterStore, LoggingEventPublisher, PostgresRosterReader, PostgresRosterRepository,
    SystemClock,
};
use lesson_engine::config::{AppConfig, DatabaseConfig, ServerConfig};
use lesson_engine::domain::schedule::DeadlinePolicy;
use lesson_engine::ports::{RosterReader, RosterRepository};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);

    let policy = config.schedule.deadline_policy()?;
    let state = match &config.database {
        Some(database) => postgres_state(database, policy).await?,
        None => {
            tracing::warn!("no database configured, using the in-memory roster store");
            let store = Arc::new(InMemoryRosterStore::new());
            build_state(store.clone(), store, policy)
        }
    };

    let app = api_router(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        deadline_lead_days = policy.lead_days(),
        "lesson engine listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("lesson engine stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

async fn postgres_state(
    database: &DatabaseConfig,
    policy: DeadlinePolicy,
) -> Result<ApiState, BoxError> {
    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(&database.url)
        .await?;

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    Ok(build_state(
        Arc::new(PostgresRosterRepository::new(pool.clone())),
        Arc::new(PostgresRosterReader::new(pool)),
        policy,
    ))
}

fn build_state(
    repository: Arc<dyn RosterRepository>,
    reader: Arc<dyn RosterReader>,
    policy: DeadlinePolicy,
) -> ApiState {
    ApiState::new(
        repository,
        reader,
        Arc::new(LoggingEventPublisher::new()),
        Arc::new(SystemClock),
        policy,
    )
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers(AllowHeaders::any())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
