// src/config.rs
use crate::domain::{CanonicalStatus, StatusTable};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_MAX_PAGES: u32 = 100;
pub const DEFAULT_RECENT_LIMIT: usize = 5;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Runtime settings, read once at startup from `COURIER_*` variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: Url,
    pub api_token: String,
    pub bind_addr: SocketAddr,
    pub page_size: u32,
    pub max_pages: u32,
    pub recent_limit: usize,
    pub http_timeout: Duration,
    pub status_table: StatusTable,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base = get("COURIER_API_BASE").ok_or(ConfigError::Missing("COURIER_API_BASE"))?;
        let api_base = parse_api_base(&api_base)?;

        let api_token =
            get("COURIER_API_TOKEN").ok_or(ConfigError::Missing("COURIER_API_TOKEN"))?;

        let bind_addr = get("COURIER_BIND")
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| invalid("COURIER_BIND", e))?;

        let page_size = parse_positive(
            get("COURIER_PAGE_SIZE"),
            "COURIER_PAGE_SIZE",
            DEFAULT_PAGE_SIZE,
        )?;
        let max_pages = parse_positive(
            get("COURIER_MAX_PAGES"),
            "COURIER_MAX_PAGES",
            DEFAULT_MAX_PAGES,
        )?;
        let recent_limit = parse_positive(
            get("COURIER_RECENT_LIMIT"),
            "COURIER_RECENT_LIMIT",
            DEFAULT_RECENT_LIMIT as u32,
        )? as usize;
        let timeout_secs = parse_positive(
            get("COURIER_HTTP_TIMEOUT_SECS"),
            "COURIER_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS as u32,
        )?;

        let status_table = match get("COURIER_STATUS_ALIASES") {
            Some(list) => parse_aliases(&list, StatusTable::default())?,
            None => StatusTable::default(),
        };

        Ok(Self {
            api_base,
            api_token: api_token.trim().to_string(),
            bind_addr,
            page_size,
            max_pages,
            recent_limit,
            http_timeout: Duration::from_secs(u64::from(timeout_secs)),
            status_table,
        })
    }
}

fn invalid(key: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.to_string(),
    }
}

// Endpoints are joined onto the base, so it must end in '/'.
fn parse_api_base(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| invalid("COURIER_API_BASE", e))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("COURIER_API_BASE", "expected an http(s) URL"));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_positive(raw: Option<String>, key: &'static str, default: u32) -> Result<u32, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(invalid(key, "must be at least 1")),
        Ok(n) => Ok(n),
        Err(e) => Err(invalid(key, e)),
    }
}

/// `raw=canonical;raw=canonical`, e.g. `Handed Over=delivered;Hold=booked`.
pub fn parse_aliases(list: &str, mut table: StatusTable) -> Result<StatusTable, ConfigError> {
    for pair in list.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (raw, canonical) = pair
            .split_once('=')
            .ok_or_else(|| invalid("COURIER_STATUS_ALIASES", format!("missing '=' in '{pair}'")))?;

        let raw = raw.trim();
        if raw.is_empty() {
            return Err(invalid(
                "COURIER_STATUS_ALIASES",
                format!("empty status in '{pair}'"),
            ));
        }
        let status = canonical
            .parse::<CanonicalStatus>()
            .map_err(|e| invalid("COURIER_STATUS_ALIASES", e))?;

        table.insert(raw, status);
    }
    Ok(table)
}
