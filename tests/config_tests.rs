use std::env;

use pretty_assertions::assert_eq;
use serial_test::serial;

use punchclock::config::{Config, StorageBackend};

const KEYS: [&str; 14] = [
    "DATABASE_URL",
    "JWT_SECRET",
    "JWT_EXPIRATION_DAYS",
    "HOST",
    "PORT",
    "ENVIRONMENT",
    "BASE_URL",
    "UTC_OFFSET_MINUTES",
    "USER_CACHE_TTL_SECONDS",
    "BCRYPT_COST",
    "STORAGE",
    "ADMIN_EMAIL",
    "ADMIN_PASSWORD",
    "ADMIN_NAME",
];

/// Runs `f` with the config variables cleared, then restores them.
fn with_clean_env<F: FnOnce()>(f: F) {
    let original: Vec<(&str, Option<String>)> =
        KEYS.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in KEYS {
        unsafe {
            env::remove_var(key);
        }
    }

    f();

    for (key, value) in original {
        unsafe {
            match value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

#[test]
#[serial]
fn test_config_from_env_with_defaults() {
    with_clean_env(|| {
        let config = Config::from_env_only().unwrap();

        assert_eq!(config.database_url, "postgres://@localhost:5432/punchclock");
        assert_eq!(
            config.jwt_secret,
            "your-super-secret-jwt-key-change-this-in-production-12345"
        );
        assert_eq!(config.jwt_expiration_days, 30);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "development");
        assert_eq!(config.utc_offset_minutes, 540);
        assert_eq!(config.user_cache_ttl_seconds, 300);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.admin_email, None);
        assert_eq!(config.admin_name, "Administrator");
        assert!(config.is_development());
    });
}

#[test]
#[serial]
fn test_config_from_env_with_custom_values() {
    with_clean_env(|| {
        unsafe {
            env::set_var("DATABASE_URL", "postgres://app@db:5432/attendance");
            env::set_var("JWT_SECRET", "test-secret");
            env::set_var("JWT_EXPIRATION_DAYS", "7");
            env::set_var("HOST", "0.0.0.0");
            env::set_var("PORT", "3000");
            env::set_var("ENVIRONMENT", "production");
            env::set_var("UTC_OFFSET_MINUTES", "-300");
            env::set_var("USER_CACHE_TTL_SECONDS", "60");
            env::set_var("BCRYPT_COST", "6");
            env::set_var("STORAGE", "memory");
        }

        let config = Config::from_env_only().unwrap();

        assert_eq!(config.database_url, "postgres://app@db:5432/attendance");
        assert_eq!(config.jwt_secret, "test-secret");
        assert_eq!(config.jwt_expiration_days, 7);
        assert_eq!(config.server_address(), "0.0.0.0:3000");
        assert!(config.is_production());
        assert_eq!(config.local_offset().local_minus_utc(), -300 * 60);
        assert_eq!(config.user_cache_ttl_seconds, 60);
        assert_eq!(config.bcrypt_cost, 6);
        assert_eq!(config.storage, StorageBackend::Memory);
    });
}

#[test]
#[serial]
fn test_unparseable_numbers_fall_back_to_defaults() {
    with_clean_env(|| {
        unsafe {
            env::set_var("PORT", "not-a-port");
            env::set_var("UTC_OFFSET_MINUTES", "nine hours");
        }

        let config = Config::from_env_only().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.utc_offset_minutes, 540);
    });
}

#[test]
#[serial]
fn test_out_of_range_offset_is_rejected() {
    with_clean_env(|| {
        unsafe {
            env::set_var("UTC_OFFSET_MINUTES", "900");
        }

        assert!(Config::from_env_only().is_err());
    });
}

#[test]
#[serial]
fn test_unknown_storage_backend_is_rejected() {
    with_clean_env(|| {
        unsafe {
            env::set_var("STORAGE", "sqlite");
        }

        let err = Config::from_env_only().unwrap_err();
        assert!(err.to_string().contains("sqlite"));
    });
}

#[test]
#[serial]
fn test_admin_credentials_are_read_together() {
    with_clean_env(|| {
        unsafe {
            env::set_var("ADMIN_EMAIL", "root@example.com");
            env::set_var("ADMIN_PASSWORD", "bootstrap-pass");
            env::set_var("ADMIN_NAME", "Site Admin");
        }
        let config = Config::from_env_only().unwrap();
        assert_eq!(config.admin_email.as_deref(), Some("root@example.com"));
        assert_eq!(config.admin_password.as_deref(), Some("bootstrap-pass"));
        assert_eq!(config.admin_name, "Site Admin");

        unsafe {
            env::remove_var("ADMIN_PASSWORD");
        }
        assert!(Config::from_env_only().is_err());
    });
}
