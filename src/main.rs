use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledgerlens_backend::config::Config;
use ledgerlens_backend::services::aggregator::AggregationOptions;
use ledgerlens_backend::services::gemini::GeminiService;
use ledgerlens_backend::services::nessie::NessieService;
use ledgerlens_backend::{AppState, handlers};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ledgerlens_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Connect to the graph store. The store is optional: without it the
    // API still serves transactions, loans, and analysis.
    let db = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            match Database::connect(database_url).await {
                Ok(db) => {
                    tracing::info!("Running migrations...");
                    migration::Migrator::up(&db, None)
                        .await
                        .expect("Failed to run migrations");
                    Some(db)
                }
                Err(err) => {
                    tracing::warn!("Database connection failed, graph store disabled: {}", err);
                    None
                }
            }
        }
        None => {
            tracing::warn!("DATABASE_URL not set, graph store disabled");
            None
        }
    };

    let state = AppState {
        db,
        bank: NessieService::new(
            config.nessie_api_key.clone(),
            config.nessie_base_url.clone(),
            config.fetch_timeout_secs,
        ),
        llm: GeminiService::new(
            config.gemini_api_key.clone(),
            config.gemini_base_url.clone(),
            config.gemini_model.clone(),
        ),
        aggregation: AggregationOptions {
            concurrency: config.fanout_concurrency,
            timeout: Duration::from_secs(config.aggregation_timeout_secs),
        },
    };

    // Build router
    let app = Router::new()
        .route("/", get(handlers::health::root))
        .route("/api/health", get(handlers::health::health_check))
        .route("/api/echo", post(handlers::health::echo))
        .route(
            "/api/transactions",
            get(handlers::transaction::get_transactions),
        )
        .route("/api/loans", get(handlers::loan::get_loans))
        .route("/api/credit-score", get(handlers::loan::get_credit_score))
        .route(
            "/api/graphs",
            get(handlers::graph::get_graphs).post(handlers::graph::create_graph),
        )
        .route(
            "/api/graphs/{graph_id}",
            get(handlers::graph::get_graph)
                .put(handlers::graph::update_graph)
                .delete(handlers::graph::delete_graph),
        )
        .route(
            "/api/generate-analysis",
            post(handlers::analysis::generate_analysis),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port))
        .await
        .unwrap();

    tracing::info!("Server listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
