//! Application configuration

use std::env;

use wdi_billing::{PriceIds, StripeConfig, DEFAULT_WEBHOOK_TOLERANCE_SECS};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    pub public_url: String,
    pub cors_allowed_origins: Vec<String>,
    pub log_format: LogFormat,

    // Stripe
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    pub stripe_price_student: Option<String>,
    pub stripe_price_professional: Option<String>,
    pub stripe_webhook_tolerance_secs: i64,

    // Feature flags
    pub enable_billing: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let enable_billing = env::var("ENABLE_BILLING")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        // Secrets are only required when checkout is switched on
        let required_secret = |name: &'static str| -> Result<String, ConfigError> {
            match env::var(name) {
                Ok(value) if !value.trim().is_empty() => Ok(value),
                _ if enable_billing => Err(ConfigError::Missing(name)),
                _ => Ok(String::new()),
            }
        };

        let public_url = env::var("PUBLIC_URL")
            .or_else(|_| env::var("NEXT_PUBLIC_BASE_URL"))
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_else(|_| vec![public_url.clone()]),
            public_url,
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },

            // Stripe
            stripe_secret_key: required_secret("STRIPE_SECRET_KEY")?,
            stripe_webhook_secret: required_secret("STRIPE_WEBHOOK_SECRET")?,
            stripe_price_student: env::var("STRIPE_STUDENT_PRICE_ID").ok(),
            stripe_price_professional: env::var("STRIPE_PROFESSIONAL_PRICE_ID").ok(),
            stripe_webhook_tolerance_secs: match env::var("STRIPE_WEBHOOK_TOLERANCE_SECS") {
                Ok(value) => value.parse().map_err(|_| {
                    ConfigError::Invalid("STRIPE_WEBHOOK_TOLERANCE_SECS must be an integer")
                })?,
                Err(_) => DEFAULT_WEBHOOK_TOLERANCE_SECS,
            },

            // Feature flags
            enable_billing,
        })
    }

    /// Billing configuration derived from this config
    pub fn stripe_config(&self) -> StripeConfig {
        StripeConfig {
            secret_key: self.stripe_secret_key.clone(),
            webhook_secret: self.stripe_webhook_secret.clone(),
            price_ids: PriceIds {
                student: self.stripe_price_student.clone(),
                professional: self.stripe_price_professional.clone(),
            },
            app_base_url: self.public_url.clone(),
            webhook_tolerance_secs: self.stripe_webhook_tolerance_secs,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}
