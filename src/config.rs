//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. Resolution order: real environment variables win
//! over values loaded from an optional `.env` file, which win over the
//! built-in defaults. A malformed value is fatal at startup.

use std::env;

use thiserror::Error;

/// Error raised when a configuration variable cannot be resolved.
///
/// Configuration errors are fatal: `main` propagates them and the process
/// exits non-zero before binding any socket.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set to a value that does not parse or is out of range
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        /// Name of the environment variable
        var: &'static str,
        /// The offending value as found in the environment
        value: String,
        /// Why the value was rejected
        reason: String,
    },
}

/// Application configuration
///
/// Constructed once at startup and never mutated afterwards; handlers
/// receive it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Snapshot output configuration
    pub snapshot: SnapshotConfig,
    /// Default tracing filter directive (overridden by `RUST_LOG`)
    pub log_level: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to bind the server to
    pub port: u16,
}

/// Snapshot output configuration
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Directory where snapshot JSON pages are written
    pub dir: String,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// Calling this more than once in the same process yields equivalent
    /// values as long as the environment is unchanged.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: resolve_port()?,
            },
            snapshot: SnapshotConfig {
                dir: env::var("SNAPSHOT_DIR").unwrap_or_else(|_| "snapshots".to_string()),
            },
            log_level: resolve_log_level()?,
        })
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn resolve_port() -> Result<u16, ConfigError> {
    let raw = match env::var("PORT") {
        Ok(value) => value,
        Err(_) => return Ok(8000),
    };

    let port: u16 = raw.parse().map_err(|_| ConfigError::Invalid {
        var: "PORT",
        value: raw.clone(),
        reason: "must be an integer between 1 and 65535".to_string(),
    })?;

    if port == 0 {
        return Err(ConfigError::Invalid {
            var: "PORT",
            value: raw,
            reason: "port 0 is not bindable".to_string(),
        });
    }

    Ok(port)
}

fn resolve_log_level() -> Result<String, ConfigError> {
    let value = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::EnvFilter::try_new(&value).map_err(|e| ConfigError::Invalid {
        var: "LOG_LEVEL",
        value: value.clone(),
        reason: e.to_string(),
    })?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for var in ["HOST", "PORT", "LOG_LEVEL", "SNAPSHOT_DIR"] {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();

        let config = Config::from_env().expect("defaults should resolve");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.snapshot.dir, "snapshots");
        assert_eq!(config.server_addr(), "127.0.0.1:8000");
    }

    #[test]
    #[serial]
    fn test_env_overrides_defaults() {
        clear_env();
        env::set_var("HOST", "0.0.0.0");
        env::set_var("PORT", "9001");
        env::set_var("LOG_LEVEL", "debug");

        let config = Config::from_env().expect("explicit values should resolve");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.log_level, "debug");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_wins_over_dotenv_file() {
        clear_env();
        env::set_var("PORT", "9000");

        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let env_path = dir.path().join(".env");
        let mut file = std::fs::File::create(&env_path).expect("Failed to create .env");
        writeln!(file, "PORT=8080").expect("Failed to write .env");

        // dotenvy never overwrites variables already present in the process
        // environment, which is exactly the documented precedence.
        dotenvy::from_path(&env_path).expect("Failed to load .env");

        let config = Config::from_env().expect("should resolve");
        assert_eq!(config.server.port, 9000);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_dotenv_file_wins_over_default() {
        clear_env();

        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let env_path = dir.path().join(".env");
        let mut file = std::fs::File::create(&env_path).expect("Failed to create .env");
        writeln!(file, "SNAPSHOT_DIR=/tmp/from-dotenv").expect("Failed to write .env");

        dotenvy::from_path(&env_path).expect("Failed to load .env");

        let config = Config::from_env().expect("should resolve");
        assert_eq!(config.snapshot.dir, "/tmp/from-dotenv");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_fatal() {
        clear_env();
        env::set_var("PORT", "notanumber");

        let err = Config::from_env().expect_err("non-numeric port must fail");
        let message = err.to_string();
        assert!(message.contains("PORT"));
        assert!(message.contains("notanumber"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_log_level_is_fatal() {
        clear_env();
        env::set_var("LOG_LEVEL", "!!not a filter directive!!");

        let err = Config::from_env().expect_err("bad filter directive must fail");
        assert!(err.to_string().contains("LOG_LEVEL"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_port_zero_is_fatal() {
        clear_env();
        env::set_var("PORT", "0");

        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_port_out_of_range_is_fatal() {
        clear_env();
        env::set_var("PORT", "65536");

        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_resolution_is_idempotent() {
        clear_env();
        env::set_var("PORT", "9100");
        env::set_var("SNAPSHOT_DIR", "/tmp/snaps");

        let first = Config::from_env().expect("should resolve");
        let second = Config::from_env().expect("should resolve");
        assert_eq!(first.server.host, second.server.host);
        assert_eq!(first.server.port, second.server.port);
        assert_eq!(first.log_level, second.log_level);
        assert_eq!(first.snapshot.dir, second.snapshot.dir);

        clear_env();
    }
}
