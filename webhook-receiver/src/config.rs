//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup. Defaults reproduce the classic
//! test server: port 9999 on all interfaces with the `test-secret-key` secret.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tracing::warn;

/// Port used when `PORT` is unset or invalid.
pub const DEFAULT_PORT: u16 = 9999;

/// Shared secret used when `WEBHOOK_SECRET` is unset.
pub const DEFAULT_SECRET: &str = "test-secret-key";

/// Receiver configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the listener binds to
    pub bind_addr: IpAddr,

    /// Port the listener binds to
    pub port: u16,

    /// Shared secret for `X-Headwind-Signature` verification.
    /// `None` disables verification.
    pub webhook_secret: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            webhook_secret: Some(DEFAULT_SECRET.to_string()),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            bind_addr: parse_var("BIND_ADDR", defaults.bind_addr),

            port: parse_var("PORT", defaults.port),

            webhook_secret: match env::var("WEBHOOK_SECRET") {
                Ok(secret) => normalize_secret(secret),
                Err(_) => defaults.webhook_secret,
            },
        }
    }

    /// Socket address to bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Secret as a borrowed str, if verification is enabled.
    pub fn secret(&self) -> Option<&str> {
        self.webhook_secret.as_deref()
    }
}

/// An empty or whitespace-only secret turns verification off.
fn normalize_secret(raw: String) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw)
    }
}

/// Parse an env var, falling back to `default` when unset or invalid.
fn parse_var<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, default = %default, "invalid_value_using_default");
            default
        }
    }
}
