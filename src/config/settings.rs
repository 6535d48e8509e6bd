//! Runtime settings read from the environment.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{EngineError, EngineResult};

const DEFAULT_POLICY_PATH: &str = "./config/policy.yaml";
const DEFAULT_RATES_API_URL: &str = "https://api.exchangerate.host";
const DEFAULT_RATES_TIMEOUT_SECS: u64 = 10;
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings for the command line tool and HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Where the policy YAML lives (`EXPENSE_POLICY_PATH`).
    pub policy_path: PathBuf,
    /// Exchange rate service.
    pub rates: RatesSettings,
    /// HTTP server binding.
    pub server: ServerSettings,
    /// Default `tracing` filter when `RUST_LOG` is unset (`APP_LOG_LEVEL`).
    pub log_level: String,
}

/// Exchange rate service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatesSettings {
    /// Base URL of the rate service (`RATES_API_URL`).
    pub api_url: String,
    /// Optional access key sent as `access_key` (`RATES_API_KEY`).
    pub api_key: Option<String>,
    /// Request timeout (`RATES_TIMEOUT_SECS`).
    pub timeout: Duration,
}

/// HTTP server binding settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Host or IP address (`APP_HOST`).
    pub host: String,
    /// TCP port (`APP_PORT`).
    pub port: u16,
}

impl ServerSettings {
    /// Resolves the host and port into a socket address.
    pub fn socket_addr(&self) -> EngineResult<SocketAddr> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self.host.parse().map_err(|_| EngineError::InvalidSetting {
            name: "APP_HOST".to_string(),
            message: format!("'{}' is not an IPv4 or IPv6 address", self.host),
        })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Settings {
    /// Reads settings from the process environment, honoring a `.env` file.
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let timeout_secs = match get("RATES_TIMEOUT_SECS") {
            Some(raw) => parse_number::<u64>("RATES_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_RATES_TIMEOUT_SECS,
        };
        let port = match get("APP_PORT") {
            Some(raw) => parse_number::<u16>("APP_PORT", &raw)?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            policy_path: PathBuf::from(
                get("EXPENSE_POLICY_PATH").unwrap_or_else(|| DEFAULT_POLICY_PATH.to_string()),
            ),
            rates: RatesSettings {
                api_url: get("RATES_API_URL")
                    .unwrap_or_else(|| DEFAULT_RATES_API_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                api_key: get("RATES_API_KEY"),
                timeout: Duration::from_secs(timeout_secs),
            },
            server: ServerSettings {
                host: get("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
            log_level: get("APP_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> EngineResult<T> {
    raw.trim().parse::<T>().map_err(|_| EngineError::InvalidSetting {
        name: name.to_string(),
        message: format!("'{}' is not a valid number", raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> EngineResult<Settings> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.policy_path, PathBuf::from("./config/policy.yaml"));
        assert_eq!(settings.rates.api_url, "https://api.exchangerate.host");
        assert_eq!(settings.rates.api_key, None);
        assert_eq!(settings.rates.timeout, Duration::from_secs(10));
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_overrides_are_applied() {
        let settings = settings_from(&[
            ("EXPENSE_POLICY_PATH", "/etc/expenses/policy.yaml"),
            ("RATES_API_URL", "http://rates.internal/v1/"),
            ("RATES_API_KEY", "secret"),
            ("RATES_TIMEOUT_SECS", "3"),
            ("APP_HOST", "0.0.0.0"),
            ("APP_PORT", "8080"),
            ("APP_LOG_LEVEL", "debug"),
        ])
        .unwrap();

        assert_eq!(settings.policy_path, PathBuf::from("/etc/expenses/policy.yaml"));
        assert_eq!(settings.rates.api_url, "http://rates.internal/v1");
        assert_eq!(settings.rates.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.rates.timeout, Duration::from_secs(3));
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let settings = settings_from(&[("RATES_API_KEY", "  "), ("APP_PORT", "")]).unwrap();
        assert_eq!(settings.rates.api_key, None);
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        match settings_from(&[("APP_PORT", "seventy")]) {
            Err(EngineError::InvalidSetting { name, .. }) => assert_eq!(name, "APP_PORT"),
            other => panic!("Expected InvalidSetting, got {:?}", other),
        }
    }

    #[test]
    fn test_socket_addr_resolves_localhost() {
        let server = ServerSettings {
            host: "localhost".to_string(),
            port: 4000,
        };
        assert_eq!(server.socket_addr().unwrap().to_string(), "127.0.0.1:4000");
    }

    #[test]
    fn test_socket_addr_rejects_hostnames() {
        let server = ServerSettings {
            host: "example.com".to_string(),
            port: 4000,
        };
        assert!(server.socket_addr().is_err());
    }
}
