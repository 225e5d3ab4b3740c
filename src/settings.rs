use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};

/// Upper bound for the rate-limit window (30 days).
pub const MAX_RATE_LIMIT_WINDOW_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

/// Where accepted submissions are delivered.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    Database,
    Relay,
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_delivery_mode")]
    pub delivery_mode: DeliveryMode,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_true")]
    pub run_migrations: bool,

    #[serde(default)]
    pub relay_url: String,

    #[serde(default)]
    pub relay_access_key: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_trusted_ip_headers")]
    pub trusted_ip_headers: Vec<String>,

    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: u32,

    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    #[serde(default = "default_rate_limit_sweep_threshold")]
    pub rate_limit_sweep_threshold: usize,

    #[serde(default = "default_rate_limit_sweep_interval_secs")]
    pub rate_limit_sweep_interval_secs: u64,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    #[serde(default = "default_persistence_timeout_secs")]
    pub persistence_timeout_secs: u64,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Contact-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_delivery_mode() -> DeliveryMode {
    DeliveryMode::Database
}
fn default_true() -> bool {
    true
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_trusted_ip_headers() -> Vec<String> {
    vec![
        "x-nf-client-connection-ip".to_string(),
        "x-forwarded-for".to_string(),
        "x-real-ip".to_string(),
    ]
}
fn default_rate_limit_max_requests() -> u32 {
    5
}
fn default_rate_limit_window_secs() -> u64 {
    3600
}
fn default_rate_limit_sweep_threshold() -> usize {
    10_000
}
fn default_rate_limit_sweep_interval_secs() -> u64 {
    300
}
fn default_max_body_bytes() -> usize {
    10 * 1024
}
fn default_persistence_timeout_secs() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: default_worker_count(),
            delivery_mode: default_delivery_mode(),
            database_url: String::new(),
            run_migrations: true,
            relay_url: String::new(),
            relay_access_key: String::new(),
            cors_allowed_origins: default_cors_origins(),
            trusted_ip_headers: default_trusted_ip_headers(),
            rate_limit_max_requests: default_rate_limit_max_requests(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            rate_limit_sweep_threshold: default_rate_limit_sweep_threshold(),
            rate_limit_sweep_interval_secs: default_rate_limit_sweep_interval_secs(),
            max_body_bytes: default_max_body_bytes(),
            persistence_timeout_secs: default_persistence_timeout_secs(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .with_list_parse_key("trusted_ip_headers")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        match self.delivery_mode {
            DeliveryMode::Database if self.database_url.trim().is_empty() => {
                errors.push("DATABASE_URL is required when delivery_mode is database");
            }
            DeliveryMode::Relay if self.relay_url.trim().is_empty() => {
                errors.push("RELAY_URL is required when delivery_mode is relay");
            }
            DeliveryMode::Relay if self.relay_access_key.trim().is_empty() => {
                errors.push("RELAY_ACCESS_KEY is required when delivery_mode is relay");
            }
            _ => {}
        }
        if self.rate_limit_max_requests == 0 {
            errors.push("RATE_LIMIT_MAX_REQUESTS must be greater than zero");
        }
        if self.rate_limit_window_secs == 0 {
            errors.push("RATE_LIMIT_WINDOW_SECS must be greater than zero");
        }
        if self.rate_limit_window_secs > MAX_RATE_LIMIT_WINDOW_SECS {
            errors.push("RATE_LIMIT_WINDOW_SECS must not exceed 30 days");
        }
        if self.persistence_timeout_secs == 0 {
            errors.push("PERSISTENCE_TIMEOUT_SECS must be greater than zero");
        }
        if self.max_body_bytes == 0 {
            errors.push("MAX_BODY_BYTES must be greater than zero");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        split_list(&self.cors_allowed_origins)
    }

    pub fn ip_headers(&self) -> Vec<String> {
        split_list(&self.trusted_ip_headers)
            .into_iter()
            .map(|h| h.to_lowercase())
            .collect()
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn persistence_timeout(&self) -> Duration {
        Duration::from_secs(self.persistence_timeout_secs)
    }
}

fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("delivery_mode", &self.delivery_mode)
            .field("database_url", &self.database_url.redact())
            .field("run_migrations", &self.run_migrations)
            .field("relay_url", &self.relay_url)
            .field("relay_access_key", &self.relay_access_key.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("trusted_ip_headers", &self.trusted_ip_headers)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("rate_limit_sweep_threshold", &self.rate_limit_sweep_threshold)
            .field("rate_limit_sweep_interval_secs", &self.rate_limit_sweep_interval_secs)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("persistence_timeout_secs", &self.persistence_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_mode_requires_url() {
        let config = AppConfig::default();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("DATABASE_URL"));
    }

    #[test]
    fn relay_mode_requires_access_key() {
        let config = AppConfig {
            delivery_mode: DeliveryMode::Relay,
            relay_url: "https://relay.example.com/submit".into(),
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("RELAY_ACCESS_KEY"));
    }

    #[test]
    fn production_rejects_wildcard_cors() {
        let config = AppConfig {
            env: AppEnvironment::Production,
            database_url: "postgres://localhost/contact".into(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_durations() {
        let base = AppConfig {
            database_url: "postgres://localhost/contact".into(),
            ..AppConfig::default()
        };
        assert!(base.validate().is_ok());

        let huge_window = AppConfig {
            rate_limit_window_secs: u64::MAX / 2,
            ..base.clone()
        };
        let err = huge_window.validate().unwrap_err().to_string();
        assert!(err.contains("RATE_LIMIT_WINDOW_SECS"));

        let zero_timeout = AppConfig {
            persistence_timeout_secs: 0,
            ..base
        };
        let err = zero_timeout.validate().unwrap_err().to_string();
        assert!(err.contains("PERSISTENCE_TIMEOUT_SECS"));
    }

    #[test]
    fn ip_headers_are_split_and_lowercased() {
        let config = AppConfig {
            trusted_ip_headers: vec!["X-Real-IP, CF-Connecting-IP".into()],
            ..AppConfig::default()
        };
        assert_eq!(config.ip_headers(), vec!["x-real-ip", "cf-connecting-ip"]);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = AppConfig {
            database_url: "postgres://user:hunter2@db/contact".into(),
            relay_access_key: "secret-key".into(),
            ..AppConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("secret-key"));
    }
}
