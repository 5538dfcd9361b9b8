use std::fmt;
use std::net::IpAddr;

use async_trait::async_trait;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    A,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedZone {
    pub id: String,
    pub name: String,
}

impl HostedZone {
    /// Builds a zone from a raw provider id, dropping any `/hostedzone/`
    /// style path prefix.
    pub fn new(id: &str, name: impl Into<String>) -> Self {
        let id = id.rsplit('/').next().unwrap_or(id);
        Self {
            id: id.to_string(),
            name: name.into(),
        }
    }
}

/// A record set as stored by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    pub name: String,
    pub record_type: String,
    pub ttl: Option<u32>,
    pub values: Vec<String>,
}

impl RecordSet {
    pub fn is_type(&self, record_type: RecordType) -> bool {
        self.record_type.eq_ignore_ascii_case(record_type.as_str())
    }

    pub fn contains(&self, ip: IpAddr) -> bool {
        self.values
            .iter()
            .any(|value| value.trim().parse::<IpAddr>().map_or(false, |v| v == ip))
    }
}

/// The single-value upsert issued when a record is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChange {
    pub name: String,
    pub record_type: RecordType,
    pub ttl: u32,
    pub value: IpAddr,
    pub comment: Option<String>,
}

impl RecordChange {
    pub fn upsert_a(name: &str, ttl: u32, value: IpAddr) -> Self {
        Self {
            name: name.to_string(),
            record_type: RecordType::A,
            ttl,
            value,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every hosted zone visible to the configured credentials
    async fn list_zones(&self) -> Result<Vec<HostedZone>>;

    /// List record sets starting at `start_name`/`start_type` in provider order.
    /// Records that sort after the start point may be included.
    async fn list_record_sets(
        &self,
        zone_id: &str,
        start_name: &str,
        start_type: RecordType,
    ) -> Result<Vec<RecordSet>>;

    /// Create or overwrite a record in one atomic change, returning the
    /// provider's change status
    async fn upsert_record(&self, zone_id: &str, change: &RecordChange) -> Result<String>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
