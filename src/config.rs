use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Settings {
    // App
    pub app_name: String,
    pub app_version: String,
    pub host: String,
    pub port: u16,

    // OpenAI-compatible provider
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_max_tokens: u32,
    pub openai_temperature: f32,
    pub openai_timeout: u64,

    // Prompt & guardrails
    pub history_window: usize,
    pub approved_products_file: Option<PathBuf>,
    pub blocked_brands_file: Option<PathBuf>,
    pub screen_replies: bool,

    // CORS
    pub cors_origins: String,

    // Logging
    pub log_level: String,
    pub log_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Cocktail Recipe Assistant".into(),
            app_version: env!("CARGO_PKG_VERSION").into(),
            host: "0.0.0.0".into(),
            port: 10000,
            openai_api_key: String::new(),
            openai_base_url: "https://api.openai.com/v1".into(),
            openai_model: "gpt-4o-mini".into(),
            openai_max_tokens: 700,
            openai_temperature: 0.7,
            openai_timeout: 60,
            history_window: 10,
            approved_products_file: None,
            blocked_brands_file: None,
            screen_replies: false,
            cors_origins: "*".into(),
            log_level: "info".into(),
            log_format: "text".into(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            app_name: env::var("APP_NAME").unwrap_or(defaults.app_name),
            app_version: env::var("APP_VERSION").unwrap_or(defaults.app_version),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parsed_var("PORT", defaults.port),

            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.openai_base_url),
            openai_model: env::var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_max_tokens: parsed_var("OPENAI_MAX_TOKENS", defaults.openai_max_tokens),
            openai_temperature: parsed_var("OPENAI_TEMPERATURE", defaults.openai_temperature),
            openai_timeout: parsed_var("OPENAI_TIMEOUT", defaults.openai_timeout),

            history_window: parsed_var("HISTORY_WINDOW", defaults.history_window),
            approved_products_file: path_var("APPROVED_PRODUCTS_FILE"),
            blocked_brands_file: path_var("BLOCKED_BRANDS_FILE"),
            screen_replies: parsed_var("SCREEN_REPLIES", defaults.screen_replies),

            cors_origins: env::var("CORS_ORIGINS").unwrap_or(defaults.cors_origins),

            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
        }
    }

    /// Origins accepted by the CORS layer. Bare hostnames are served over https.
    pub fn cors_origins_list(&self) -> Vec<String> {
        if self.cors_origins.trim() == "*" {
            return vec!["*".to_string()];
        }
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.contains("://") {
                    s.trim_end_matches('/').to_string()
                } else {
                    format!("https://{s}")
                }
            })
            .collect()
    }

    pub fn provider_configured(&self) -> bool {
        !self.openai_api_key.is_empty()
    }
}

fn parsed_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn path_var(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}
