use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ip::{DEFAULT_IP_SERVICE, DEFAULT_TIMEOUT_SECS};

/// Validated configuration for a single reconciliation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub record: Option<String>,
    #[serde(default)]
    pub zone_id: Option<String>,
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default = "default_ttl")]
    pub ttl: u32,
    #[serde(default = "default_ip_service")]
    pub ip_service: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_comment")]
    pub comment: String,
    #[serde(default)]
    pub dry_run: bool,
}

fn default_profile() -> String {
    "ddns".to_string()
}

fn default_ttl() -> u32 {
    300
}

fn default_ip_service() -> String {
    DEFAULT_IP_SERVICE.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_comment() -> String {
    "route53-dyndns".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            domain: String::new(),
            record: None,
            zone_id: None,
            profile: default_profile(),
            ttl: default_ttl(),
            ip_service: default_ip_service(),
            timeout_seconds: default_timeout(),
            log_level: default_log_level(),
            comment: default_comment(),
            dry_run: false,
        }
    }
}

impl Settings {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            Error::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.domain.trim().is_empty() {
            return Err(Error::config("domain is required"));
        }
        if self.ttl == 0 {
            return Err(Error::config("ttl must be a positive number of seconds"));
        }
        if self.timeout_seconds == 0 {
            return Err(Error::config("timeout must be at least one second"));
        }
        if self.ip_service.trim().is_empty() {
            return Err(Error::config("ip service endpoint must not be empty"));
        }
        Ok(())
    }

    /// The record name to manage: `{record}.{domain}`, or the apex when no
    /// record label is set.
    pub fn fqdn(&self) -> String {
        match self.record.as_deref().map(str::trim) {
            Some(record) if !record.is_empty() => format!("{}.{}", record, self.domain),
            _ => self.domain.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
