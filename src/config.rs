use std::env;

/// Runtime configuration, read once at startup. Values come from the
/// environment (with `.env` loaded first via dotenvy in `main`).
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Optional: when unset the graph store is disabled.
    pub database_url: Option<String>,
    pub nessie_base_url: String,
    pub nessie_api_key: String,
    pub gemini_base_url: String,
    /// Optional: analysis requests fail with 503 when unset.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// Timeout for a single sandbox GET.
    pub fetch_timeout_secs: u64,
    /// Budget for a whole aggregation fan-out.
    pub aggregation_timeout_secs: u64,
    /// Concurrent sub-fetches per aggregation request.
    pub fanout_concurrency: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("PORT", 8000),
            database_url: env::var("DATABASE_URL").ok(),
            nessie_base_url: env::var("NESSIE_BASE_URL")
                .unwrap_or_else(|_| "http://api.nessieisreal.com".to_string()),
            nessie_api_key: env::var("NESSIE_API_KEY").unwrap_or_default(),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            gemini_api_key: env::var("GOOGLE_API_KEY").ok(),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            fetch_timeout_secs: parse_env("FETCH_TIMEOUT_SECS", 10),
            aggregation_timeout_secs: parse_env("AGGREGATION_TIMEOUT_SECS", 30),
            fanout_concurrency: parse_env("FANOUT_CONCURRENCY", 8),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
