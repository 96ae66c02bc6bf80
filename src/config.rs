//! Server configuration read from the environment (and `.env`, loaded by the binary).

use thiserror::Error;

/// Errors while reading configuration.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// A variable is set but cannot be used.
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Web server configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    /// Bind host, `HOST` (default `0.0.0.0` so the app is reachable on a VPS).
    pub host: String,
    /// Bind port, `PORT` (default 8080).
    pub port: u16,
    /// Token admin requests must send in `X-Admin-Token`, `ADMIN_TOKEN`.
    /// When unset, admin routes are open.
    pub admin_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            admin_token: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` (the environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(default_host);
        let port = match lookup("PORT") {
            Some(p) => p.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "PORT".to_string(),
                reason: format!("'{}' is not a port number", p),
            })?,
            None => default_port(),
        };
        let admin_token = lookup("ADMIN_TOKEN").filter(|t| !t.is_empty());
        Ok(Self {
            host,
            port,
            admin_token,
        })
    }

    /// Whether a request carrying `token` may use admin routes.
    pub fn is_admin(&self, token: Option<&str>) -> bool {
        match &self.admin_token {
            Some(expected) => token == Some(expected.as_str()),
            None => true,
        }
    }
}
