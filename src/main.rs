use borrow_direct_gateway::{
    adapters::mock::{
        RequestRepository as MockRequestRepository, StaticPatronAuth,
        VendorClient as MockVendorClient,
    },
    adapters::postgres::{PostgresDispatchRegistry, PostgresResponseStore},
    api::{handlers::AppState, router::create_router},
    application::{StatusTracker, SubmissionDeps},
    config::GatewayConfig,
    domain::whitelist::UrlWhitelist,
    domain::value_objects::ServiceId,
    ports::patron_auth::{PatronAuthenticator, UnconfiguredPatronAuth},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "borrow_direct_gateway=debug,tower_http=debug,axum=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(GatewayConfig::from_env());

    // Database connection URL
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/resolver".into());

    tracing::info!("Database URL: {}", database_url);

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Initialize adapters. The vendor wire protocol is out of scope here, so
    // the scripted client stands in; deployments substitute a real one.
    let responses = Arc::new(PostgresResponseStore::new(pool.clone()));
    let dispatch = Arc::new(PostgresDispatchRegistry::new(pool.clone()));
    let requests = Arc::new(MockRequestRepository::new());
    let vendor = Arc::new(MockVendorClient::new());

    // Patron authentication must be wired per deployment. Without it the
    // background submission fails loudly with a configuration error.
    let patron_auth: Arc<dyn PatronAuthenticator> = match std::env::var("BD_PATRON_BARCODE") {
        Ok(barcode) => Arc::new(StaticPatronAuth::new(barcode)),
        Err(_) => Arc::new(UnconfiguredPatronAuth),
    };

    let status_tracker = Arc::new(StatusTracker::new(responses.clone()));
    let whitelist = UrlWhitelist::new(&config.redirect_whitelist);

    // Create service dependencies
    let submission_deps = SubmissionDeps {
        config: config.clone(),
        service_id: ServiceId::new(config.display_name.clone()),
        requests,
        responses,
        dispatch,
        vendor,
        patron_auth,
        status_tracker,
        whitelist,
    };

    // Create application state
    let app_state = Arc::new(AppState { submission_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
