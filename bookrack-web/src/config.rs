/// Configuration management for the web server
///
/// Loads configuration from environment variables into a type-safe struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `HOST`: Host to bind to (default: 0.0.0.0)
/// - `PORT`: Port to bind to (default: 8080)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `LOOKUP_URL`: External review-count endpoint (default: Goodreads)
/// - `LOOKUP_KEY`: API key for the external lookup (optional; lookup is
///   disabled when unset)
/// - `LOOKUP_TIMEOUT_SECS`: Bound on the external call (default: 3)
/// - `SECURE_COOKIES`: Set the Secure flag on session cookies (default:
///   false; enable behind TLS)
/// - `RUST_LOG`: Log level (default: info)
///
/// # Example
///
/// ```no_run
/// use bookrack_web::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Web server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// External review-count lookup configuration
    pub lookup: LookupConfig,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Whether to set the Secure flag on session cookies
    pub secure_cookies: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// External review-count lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Endpoint URL
    pub url: String,

    /// Query key; the lookup is disabled (always Unavailable) when None
    pub key: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or
    /// have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let secure_cookies = env::var("SECURE_COOKIES")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let lookup_url = env::var("LOOKUP_URL")
            .unwrap_or_else(|_| "https://www.goodreads.com/book/review_counts.json".to_string());

        let lookup_key = env::var("LOOKUP_KEY").ok().filter(|k| !k.is_empty());

        let lookup_timeout = env::var("LOOKUP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()?;

        Ok(Self {
            server: ServerConfig {
                host,
                port,
                secure_cookies,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            lookup: LookupConfig {
                url: lookup_url,
                key: lookup_key,
                timeout_seconds: lookup_timeout,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                secure_cookies: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            lookup: LookupConfig {
                url: "https://example.com/review_counts.json".to_string(),
                key: Some("key".to_string()),
                timeout_seconds: 3,
            },
        }
    }

    #[test]
    fn test_bind_address() {
        let config = test_config();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }
}
