use anyhow::{Result, bail};
use chrono::{FixedOffset, Offset, Utc};
use std::env;
use std::str::FromStr;

/// Largest UTC offset in use anywhere (UTC+14 / UTC-12), in minutes.
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("Invalid STORAGE backend: {}", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_days: i64,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
    /// Offset of the office's local time from UTC. Date keys and the
    /// late/early-leave rules are evaluated in this zone.
    pub utc_offset_minutes: i32,
    pub user_cache_ttl_seconds: u64,
    pub bcrypt_cost: u32,
    pub storage: StorageBackend,
    /// Admin account created at startup when missing.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    pub fn from_env_only() -> Result<Self> {
        let utc_offset_minutes: i32 = parse_or("UTC_OFFSET_MINUTES", 540);
        if utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            bail!(
                "UTC_OFFSET_MINUTES must be within +/-{}, got {}",
                MAX_UTC_OFFSET_MINUTES,
                utc_offset_minutes
            );
        }

        let storage = match env::var("STORAGE") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Postgres,
        };

        let admin_email = non_empty("ADMIN_EMAIL");
        let admin_password = non_empty("ADMIN_PASSWORD");
        if admin_email.is_some() != admin_password.is_some() {
            bail!("ADMIN_EMAIL and ADMIN_PASSWORD must be set together");
        }

        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://@localhost:5432/punchclock".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                "your-super-secret-jwt-key-change-this-in-production-12345".to_string()
            }),
            jwt_expiration_days: parse_or("JWT_EXPIRATION_DAYS", 30),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            client_base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            utc_offset_minutes,
            user_cache_ttl_seconds: parse_or("USER_CACHE_TTL_SECONDS", 300),
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST),
            storage,
            admin_email,
            admin_password,
            admin_name: non_empty("ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string()),
        })
    }

    /// Fixed configuration for tests: in-memory storage, UTC+9.
    pub fn test_config() -> Self {
        Config {
            database_url: "postgres://@localhost:5432/punchclock_test".to_string(),
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            jwt_expiration_days: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
            utc_offset_minutes: 540,
            user_cache_ttl_seconds: 300,
            bcrypt_cost: 4,
            storage: StorageBackend::Memory,
            admin_email: None,
            admin_password: None,
            admin_name: "Administrator".to_string(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn local_offset(&self) -> FixedOffset {
        // Range is checked when the config is built.
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
