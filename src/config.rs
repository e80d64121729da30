use std::env;

/// Where users and tasks are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// A PostgreSQL database reachable at the given URL.
    Postgres(String),
    /// The in-process store; everything is lost on restart.
    Memory,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Session token lifetime when `TOKEN_TTL_HOURS` is unset.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
/// Ten years.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let storage = if database_url == "memory" {
            StorageBackend::Memory
        } else {
            StorageBackend::Postgres(database_url)
        };

        Ok(Self {
            storage,
            max_connections: parsed("DATABASE_MAX_CONNECTIONS", 5)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: parsed("PORT", 3000)?,
            jwt_secret: required("JWT_SECRET")?,
            token_ttl_hours: token_ttl_hours()?,
            bcrypt_cost: parsed("BCRYPT_COST", 10)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

/// Zero, negative or absurdly long lifetimes are rejected before any token is signed.
fn token_ttl_hours() -> Result<i64, ConfigError> {
    let hours = parsed("TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?;
    if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
        return Err(ConfigError::Invalid {
            name: "TOKEN_TTL_HOURS",
            value: hours.to_string(),
        });
    }
    Ok(hours)
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
