// src/lib.rs

use sea_orm::DatabaseConnection;
use services::aggregator::AggregationOptions;
use services::{gemini::GeminiService, nessie::NessieService};

#[derive(Clone)]
pub struct AppState {
    /// Graph store handle. `None` when no store is configured; the rest of
    /// the API keeps working without it.
    pub db: Option<DatabaseConnection>,
    pub bank: NessieService,
    pub llm: GeminiService,
    pub aggregation: AggregationOptions,
}

pub mod entities {
    pub mod graphs;
}

pub mod services {
    pub mod aggregator;
    pub mod extraction;
    pub mod gemini;
    pub mod loan_metrics;
    pub mod nessie;
}

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
