use anyhow::Result;
use axum::Router;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::Database;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fyyur::{
    config::{Config, LogFormat},
    handlers,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tracing::info!("Starting Fyyur...");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Connected to database");

    if config.run_migrations {
        migration::Migrator::up(&db, None).await?;
        tracing::info!("Database migrations completed");
    }

    let state = AppState::new(db, config.clone());
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Log lines carry timestamp, level, message and the file/line they came from.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fyyur=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_file(true).with_line_number(true))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_file(true).with_line_number(true))
            .init(),
    }
}

fn create_router(state: AppState) -> Router {
    handlers::routes()
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
