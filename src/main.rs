use rusty_loan_service::{
    adapters::http::{HttpCatalogService, HttpNotificationService},
    adapters::memory::InMemoryLoanRepository,
    adapters::postgres::PostgresLoanRepository,
    api::{handlers::AppState, router::create_router},
    application::loan::ServiceDependencies,
    config::AppConfig,
    ports::LoanRepository,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // .envがあれば読み込む
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize record store
    let loan_repository: Arc<dyn LoanRepository> = match &config.database.url {
        Some(database_url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(database_url)
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Connected to PostgreSQL, migrations applied");

            Arc::new(PostgresLoanRepository::new(pool))
        }
        None => {
            tracing::warn!("database.url is not set, loans are kept in memory only");
            Arc::new(InMemoryLoanRepository::new())
        }
    };

    // Initialize collaborator clients
    let catalog_service = Arc::new(HttpCatalogService::new(
        config.catalog.base_url.clone(),
        config.catalog.timeout(),
    )?);
    let notification_service = Arc::new(HttpNotificationService::new(
        config.notification.base_url.clone(),
        config.notification.sender.clone(),
        config.notification.timeout(),
    )?);

    tracing::info!(
        catalog = %config.catalog.base_url,
        notification = %config.notification.base_url,
        "Collaborator endpoints configured"
    );

    // Create service dependencies
    let service_deps = ServiceDependencies {
        loan_repository,
        catalog_service,
        notification_service,
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
