//! Server configuration.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::net::TcpListener;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_PATH: &str = "data/cutoffs.csv";
pub const DEFAULT_MODEL_PATH: &str = "college_predictor_model.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Cutoff table for the heuristic predictor
    pub data_path: PathBuf,
    /// Trained admission model artifact
    pub model_path: PathBuf,
    /// Maximum number of heuristic recommendations per request
    pub top_n: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            top_n: heuristic::DEFAULT_TOP_N,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// All optional:
    /// - `COLLEGE_RECS_HOST` (default `0.0.0.0`)
    /// - `COLLEGE_RECS_PORT` (default `5000`)
    /// - `COLLEGE_RECS_DATA` (default `data/cutoffs.csv`)
    /// - `COLLEGE_RECS_MODEL` (default `college_predictor_model.json`)
    /// - `COLLEGE_RECS_TOP_N` (default `20`)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let port = match lookup("COLLEGE_RECS_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("COLLEGE_RECS_PORT must be a port number, got '{raw}'"))?,
            None => defaults.port,
        };

        let top_n = match lookup("COLLEGE_RECS_TOP_N") {
            Some(raw) => raw.trim().parse::<usize>().with_context(|| {
                format!("COLLEGE_RECS_TOP_N must be a positive integer, got '{raw}'")
            })?,
            None => defaults.top_n,
        };
        anyhow::ensure!(top_n > 0, "COLLEGE_RECS_TOP_N must be greater than zero");

        Ok(Self {
            host: lookup("COLLEGE_RECS_HOST").unwrap_or(defaults.host),
            port,
            data_path: lookup("COLLEGE_RECS_DATA")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            model_path: lookup("COLLEGE_RECS_MODEL")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            top_n,
        })
    }

    /// Bind the listening socket, resolving `host` if it is a name
    pub async fn bind(&self) -> Result<TcpListener> {
        TcpListener::bind((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Failed to bind {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("COLLEGE_RECS_HOST", "127.0.0.1"),
            ("COLLEGE_RECS_PORT", "8080"),
            ("COLLEGE_RECS_MODEL", "/models/rf.json"),
            ("COLLEGE_RECS_TOP_N", "5"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.model_path, PathBuf::from("/models/rf.json"));
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
    }

    #[test]
    fn test_bad_values() {
        assert!(ServerConfig::from_lookup(lookup(&[("COLLEGE_RECS_PORT", "http")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("COLLEGE_RECS_TOP_N", "0")])).is_err());
    }

    #[tokio::test]
    async fn test_bind_resolves_host_names() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("COLLEGE_RECS_HOST", "localhost"),
            ("COLLEGE_RECS_PORT", "0"),
        ]))
        .unwrap();

        let listener = config.bind().await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }
}
