//! Process configuration read from the environment.
//!
//! | Variable              | Default               |
//! |-----------------------|-----------------------|
//! | `COB_DASHBOARD_DATA`  | `assets/df_geral.csv` |
//! | `COB_DASHBOARD_ADDR`  | `127.0.0.1:8050`      |
//! | `COB_DASHBOARD_LOG`   | `info`                |
//!
//! Unset variables fall back to the default; only a malformed value is an error.

use crate::errors::{AppError, AppResult};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

pub const DATA_VAR: &str = "COB_DASHBOARD_DATA";
pub const ADDR_VAR: &str = "COB_DASHBOARD_ADDR";
pub const LOG_VAR: &str = "COB_DASHBOARD_LOG";

pub const DEFAULT_DATA_PATH: &str = "assets/df_geral.csv";
pub const DEFAULT_ADDR: &str = "127.0.0.1:8050";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_path: PathBuf,
    pub addr: SocketAddr,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_path = get(DATA_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let addr_str = get(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = parse_addr(&addr_str)?;

        let log_level = match get(LOG_VAR) {
            Some(v) => v
                .trim()
                .parse::<Level>()
                .map_err(|_| AppError::Config(format!("{}: invalid log level {:?}", LOG_VAR, v)))?,
            None => Level::INFO,
        };

        Ok(Config {
            data_path,
            addr,
            log_level,
        })
    }
}

pub fn parse_addr(s: &str) -> AppResult<SocketAddr> {
    s.trim()
        .parse::<SocketAddr>()
        .map_err(|_| AppError::Config(format!("invalid listen address {:?}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn absent_variables_use_defaults() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(cfg.addr, DEFAULT_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.log_level, Level::INFO);
    }

    #[test]
    fn variables_override_defaults() {
        let cfg = Config::from_lookup(lookup(&[
            (DATA_VAR, "/srv/calls.csv"),
            (ADDR_VAR, "0.0.0.0:9000"),
            (LOG_VAR, "debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.data_path, PathBuf::from("/srv/calls.csv"));
        assert_eq!(cfg.addr.port(), 9000);
        assert_eq!(cfg.log_level, Level::DEBUG);
    }

    #[test]
    fn blank_variable_counts_as_unset() {
        let cfg = Config::from_lookup(lookup(&[(ADDR_VAR, "  ")])).unwrap();
        assert_eq!(cfg.addr.port(), 8050);
    }

    #[test]
    fn malformed_address_is_an_error() {
        let err = Config::from_lookup(lookup(&[(ADDR_VAR, "localhost")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
