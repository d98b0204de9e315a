//! Environment configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Command-line options (see `cli`) override paths and parameters; the
//! settings here cover endpoints only.

use std::net::SocketAddr;

use crate::error::AppError;

pub const DEFAULT_WORLD_BANK_API_URL: &str = "https://api.worldbank.org/v2";
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:5000";

const ENV_WORLD_BANK_API_URL: &str = "WORLD_BANK_API_URL";
const ENV_SERVER_ADDR: &str = "BRENT_SERVER_ADDR";

#[derive(Debug, Clone)]
pub struct Settings {
    pub world_bank_api_url: String,
    pub server_addr: SocketAddr,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let world_bank_api_url = lookup(ENV_WORLD_BANK_API_URL)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_WORLD_BANK_API_URL.to_string());

        let raw_addr = lookup(ENV_SERVER_ADDR).unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let server_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("Invalid {ENV_SERVER_ADDR} '{raw_addr}': {e}")))?;

        Ok(Self {
            world_bank_api_url,
            server_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.world_bank_api_url, DEFAULT_WORLD_BANK_API_URL);
        assert_eq!(settings.server_addr.to_string(), DEFAULT_SERVER_ADDR);
    }

    #[test]
    fn overrides_are_trimmed() {
        let settings = Settings::from_lookup(|key| match key {
            "WORLD_BANK_API_URL" => Some("http://localhost:9000/v2/".to_string()),
            "BRENT_SERVER_ADDR" => Some(" 0.0.0.0:8080 ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings.world_bank_api_url, "http://localhost:9000/v2");
        assert_eq!(settings.server_addr.port(), 8080);
    }

    #[test]
    fn bad_address_is_a_config_error() {
        let err = Settings::from_lookup(|key| (key == "BRENT_SERVER_ADDR").then(|| "nope".to_string())).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.exit_code(), 2);
    }
}
