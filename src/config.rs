//! Server configuration from environment variables

use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to listen on (HAT_BIND)
    pub bind_addr: SocketAddr,
    /// Snapshot file for keeping hats across restarts (HAT_DATA_FILE, None = memory only)
    pub data_file: Option<PathBuf>,
    /// Fixed seed for word draws (HAT_RNG_SEED, None = OS randomness)
    pub rng_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind(),
            data_file: None,
            rng_seed: None,
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

/// Non-empty, trimmed value of an environment variable
fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ServerConfig {
    /// Load config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let bind_addr = match env_value("HAT_BIND") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid HAT_BIND '{}', using {}", raw, DEFAULT_BIND);
                default_bind()
            }),
            None => default_bind(),
        };

        let data_file = env_value("HAT_DATA_FILE").map(PathBuf::from);

        let rng_seed = env_value("HAT_RNG_SEED").and_then(|raw| match raw.parse() {
            Ok(seed) => Some(seed),
            Err(_) => {
                tracing::warn!("Invalid HAT_RNG_SEED '{}', using OS randomness", raw);
                None
            }
        });

        tracing::info!(
            %bind_addr,
            data_file = ?data_file,
            seeded = rng_seed.is_some(),
            "Server config loaded"
        );

        Self {
            bind_addr,
            data_file,
            rng_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("HAT_BIND");
        std::env::remove_var("HAT_DATA_FILE");
        std::env::remove_var("HAT_RNG_SEED");
    }

    #[test]
    #[serial]
    fn test_defaults_when_unset() {
        clear_env();
        assert_eq!(ServerConfig::from_env(), ServerConfig::default());
    }

    #[test]
    #[serial]
    fn test_reads_all_values() {
        clear_env();
        std::env::set_var("HAT_BIND", "127.0.0.1:8080");
        std::env::set_var("HAT_DATA_FILE", " /tmp/hats.json ");
        std::env::set_var("HAT_RNG_SEED", "42");

        let config = ServerConfig::from_env();
        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.data_file, Some(PathBuf::from("/tmp/hats.json")));
        assert_eq!(config.rng_seed, Some(42));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_fall_back() {
        clear_env();
        std::env::set_var("HAT_BIND", "not an address");
        std::env::set_var("HAT_DATA_FILE", "   ");
        std::env::set_var("HAT_RNG_SEED", "-1");

        let config = ServerConfig::from_env();
        assert_eq!(config, ServerConfig::default());
        clear_env();
    }
}
