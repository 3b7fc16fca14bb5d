//! Server settings, read from `SHEETMERGE_*` environment variables.
//!
//! | variable                      | default     |
//! |-------------------------------|-------------|
//! | `SHEETMERGE_HOST`             | `127.0.0.1` |
//! | `SHEETMERGE_PORT`             | `8080`      |
//! | `SHEETMERGE_OPEN_BROWSER`     | `true`      |
//! | `SHEETMERGE_MAX_UPLOAD_BYTES` | 10 MiB      |

use std::env;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value '{value}' for {key}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Open the UI in the default browser once the server is up.
    pub open_browser: bool,
    /// Upper bound for a single multipart upload (CSV plus form data).
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            open_browser: true,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source; unset keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();
        let host = lookup("SHEETMERGE_HOST")
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or(defaults.host);
        Ok(ServerConfig {
            host,
            port: parse_var(&lookup, "SHEETMERGE_PORT", defaults.port)?,
            open_browser: parse_flag(&lookup, "SHEETMERGE_OPEN_BROWSER", defaults.open_browser)?,
            max_upload_bytes: parse_var(
                &lookup,
                "SHEETMERGE_MAX_UPLOAD_BYTES",
                defaults.max_upload_bytes,
            )?,
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError { key, value: raw }),
    }
}

fn parse_flag<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError { key, value: raw }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("SHEETMERGE_HOST", "0.0.0.0"),
            ("SHEETMERGE_PORT", "9000"),
            ("SHEETMERGE_OPEN_BROWSER", "no"),
            ("SHEETMERGE_MAX_UPLOAD_BYTES", "2048"),
        ])
        .unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert!(!config.open_browser);
        assert_eq!(config.max_upload_bytes, 2048);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            config_from(&[("SHEETMERGE_PORT", "eighty")]),
            Err(ConfigError {
                key: "SHEETMERGE_PORT",
                value: "eighty".to_string()
            })
        );
        assert!(config_from(&[("SHEETMERGE_OPEN_BROWSER", "maybe")]).is_err());
    }
}
