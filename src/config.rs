use std::env;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::blockchain::{DEFAULT_DIFFICULTY, DIFF_MAX, DIFF_MIN};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_PEER_TIMEOUT_MS: u64 = 3_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has invalid value `{value}`")]
    Invalid { key: &'static str, value: String },
    #[error("POW_DIFFICULTY must be between {min} and {max}, got {0}", min = DIFF_MIN, max = DIFF_MAX)]
    DifficultyOutOfRange(usize),
}

/// Runtime settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub difficulty: usize,
    pub peer_timeout: Duration,
    pub peers: Vec<String>,
    pub node_id: String,
}

impl NodeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or blank keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT)?;

        let difficulty = parse_or(get("POW_DIFFICULTY"), "POW_DIFFICULTY", DEFAULT_DIFFICULTY)?;
        if !(DIFF_MIN..=DIFF_MAX).contains(&difficulty) {
            return Err(ConfigError::DifficultyOutOfRange(difficulty));
        }

        let timeout_ms = parse_or(get("PEER_TIMEOUT_MS"), "PEER_TIMEOUT_MS", DEFAULT_PEER_TIMEOUT_MS)?;
        if timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "PEER_TIMEOUT_MS",
                value: "0".into(),
            });
        }

        let peers = get("PEERS")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let node_id = get("NODE_ID").unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(Self {
            host,
            port,
            difficulty,
            peer_timeout: Duration::from_millis(timeout_ms),
            peers,
            node_id,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<NodeConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NodeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.difficulty, 3);
        assert_eq!(cfg.peer_timeout, Duration::from_secs(3));
        assert!(cfg.peers.is_empty());
        assert!(Uuid::parse_str(&cfg.node_id).is_ok());
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "5001"),
            ("POW_DIFFICULTY", "4"),
            ("PEER_TIMEOUT_MS", "250"),
            ("PEERS", "http://a:5000, b:5002 ,"),
            ("NODE_ID", "miner-1"),
        ])
        .unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 5001);
        assert_eq!(cfg.difficulty, 4);
        assert_eq!(cfg.peer_timeout, Duration::from_millis(250));
        assert_eq!(cfg.peers, vec!["http://a:5000", "b:5002"]);
        assert_eq!(cfg.node_id, "miner-1");
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            config(&[("PORT", "eighty")]).unwrap_err(),
            ConfigError::Invalid {
                key: "PORT",
                value: "eighty".into()
            }
        );
        assert_eq!(
            config(&[("POW_DIFFICULTY", "9")]).unwrap_err(),
            ConfigError::DifficultyOutOfRange(9)
        );
        assert!(config(&[("PEER_TIMEOUT_MS", "0")]).is_err());
    }
}
