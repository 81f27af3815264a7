use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,

    // Queue broker
    pub redis_url: String,

    // Admin
    pub admin_token: String,

    // Feature flags
    pub use_spacy_funds: bool,
    pub use_spacy_analytics: bool,
    pub use_adv_headers: bool,
    pub use_human_delay: bool,
    pub use_url_filter: bool,

    // Per-adapter tuning
    pub rappler_latest_max_pages: u32,

    // Tier-5 discovery transport
    pub browserless_url: Option<String>,
    pub browserless_token: Option<String>,

    // API server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load config for the worker binary (scheduler + scrape/analysis runners).
    /// Panics with a clear message if required vars are missing.
    pub fn worker_from_env() -> Self {
        Self {
            database_url: database_url(),
            redis_url: redis_url(),
            admin_token: String::new(),
            use_spacy_funds: flag_env("USE_SPACY_FUNDS"),
            use_spacy_analytics: flag_env("USE_SPACY_ANALYTICS"),
            use_adv_headers: flag_env("USE_ADV_HEADERS"),
            use_human_delay: flag_env("USE_HUMAN_DELAY"),
            use_url_filter: flag_env("USE_URL_FILTER"),
            rappler_latest_max_pages: env::var("RAPPLER_LATEST_MAX_PAGES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            browserless_url: env::var("BROWSERLESS_URL").ok(),
            browserless_token: env::var("BROWSERLESS_TOKEN").ok(),
            web_host: String::new(),
            web_port: 0,
        }
    }

    /// Load config for the read-API binary.
    pub fn api_from_env() -> Self {
        Self {
            database_url: database_url(),
            redis_url: redis_url(),
            admin_token: required_env("ADMIN_TOKEN"),
            use_spacy_funds: false,
            use_spacy_analytics: false,
            use_adv_headers: false,
            use_human_delay: false,
            use_url_filter: false,
            rappler_latest_max_pages: 5,
            browserless_url: None,
            browserless_token: None,
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
        }
    }

    /// Load config for the migration binary (database only).
    pub fn migrate_from_env() -> Self {
        Self {
            database_url: database_url(),
            redis_url: String::new(),
            admin_token: String::new(),
            use_spacy_funds: false,
            use_spacy_analytics: false,
            use_adv_headers: false,
            use_human_delay: false,
            use_url_filter: false,
            rappler_latest_max_pages: 5,
            browserless_url: None,
            browserless_token: None,
            web_host: String::new(),
            web_port: 0,
        }
    }

    /// Log the presence/length of each sensitive env var without its value.
    pub fn log_redacted(&self) {
        let vars = [
            ("DATABASE_URL", &self.database_url),
            ("REDIS_URL", &self.redis_url),
            ("ADMIN_TOKEN", &self.admin_token),
        ];
        for (name, value) in vars {
            if value.is_empty() {
                tracing::info!("{name} = (empty)");
            } else {
                tracing::info!("{name} = ({} chars)", value.len());
            }
        }
    }
}

/// `DATABASE_URL` is the primary Postgres DSN; `SUPABASE_URL` +
/// `SUPABASE_SERVICE_ROLE_KEY` are accepted as a fallback so deployments
/// carrying the original variable names keep working.
fn database_url() -> String {
    if let Ok(url) = env::var("DATABASE_URL") {
        return url;
    }
    let base = required_env("SUPABASE_URL");
    let key = required_env("SUPABASE_SERVICE_ROLE_KEY");
    format!("{base}?apikey={key}")
}

fn redis_url() -> String {
    env::var("REDIS_URL")
        .or_else(|_| env::var("CELERY_BROKER_URL"))
        .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

fn flag_env(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
