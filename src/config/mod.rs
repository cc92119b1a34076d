// src/config/mod.rs
// Runtime configuration, read from the environment (and `.env`) once at startup

use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

use crate::db::Timeouts;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // ── Database
    pub mongodb_uri: String,
    pub db_name: String,

    // ── Server
    pub host: String,
    pub port: u16,

    // ── Timeouts (in seconds)
    pub insert_timeout: u64,
    pub query_timeout: u64,
    pub connect_timeout: u64,

    // ── Logging
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            db_name: "multiply_app".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            insert_timeout: 5,
            query_timeout: 10,
            connect_timeout: 10,
            log_level: "info".to_string(),
        }
    }
}

/// Parse an environment value, falling back to `default` when the variable is
/// unset or does not parse. Trailing `# comments` are ignored.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => parse_or(key, &val, default),
        Err(_) => default,
    }
}

fn parse_or<T: FromStr>(key: &str, raw: &str, default: T) -> T {
    let clean_val = raw.split('#').next().unwrap_or("").trim();
    match clean_val.parse::<T>() {
        Ok(parsed) => parsed,
        Err(_) => {
            eprintln!("Config: {} = '{}' (parse failed, using default)", key, raw);
            default
        }
    }
}

impl Config {
    /// Load from `.env` (if present) and the process environment
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            eprintln!("Note: .env file not found. Using environment variables and defaults.");
        }

        let defaults = Self::default();
        Self {
            mongodb_uri: env_var_or("MONGODB_URI", defaults.mongodb_uri),
            db_name: env_var_or("CALCBOOK_DB_NAME", defaults.db_name),
            host: env_var_or("CALCBOOK_HOST", defaults.host),
            port: env_var_or("CALCBOOK_PORT", defaults.port),
            insert_timeout: env_var_or("CALCBOOK_INSERT_TIMEOUT", defaults.insert_timeout),
            query_timeout: env_var_or("CALCBOOK_QUERY_TIMEOUT", defaults.query_timeout),
            connect_timeout: env_var_or("CALCBOOK_CONNECT_TIMEOUT", defaults.connect_timeout),
            log_level: env_var_or("CALCBOOK_LOG_LEVEL", defaults.log_level),
        }
    }

    /// Server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            insert: Duration::from_secs(self.insert_timeout),
            query: Duration::from_secs(self.query_timeout),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    /// Max tracing level; unknown names fall back to INFO
    pub fn tracing_level(&self) -> Level {
        Level::from_str(self.log_level.trim()).unwrap_or(Level::INFO)
    }
}
