use std::fmt;
use std::net::IpAddr;

use tracing::{info, warn};

use crate::dns::{DnsProvider, RecordChange, RecordSet, RecordType};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The record already holds the external address
    UpToDate,
    /// An upsert was issued; `status` is the provider's change status
    Updated { status: String },
    /// A write was needed but skipped because of a dry run
    WouldUpdate,
}

impl Outcome {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Outcome::UpToDate)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::UpToDate => write!(f, "up to date"),
            Outcome::Updated { status } => write!(f, "updated (status: {})", status),
            Outcome::WouldUpdate => write!(f, "update required (dry run)"),
        }
    }
}

/// Compares the stored A record for a name against the external address and
/// upserts it when they differ.
pub struct Reconciler<'a> {
    provider: &'a dyn DnsProvider,
    comment: Option<String>,
    dry_run: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(provider: &'a dyn DnsProvider) -> Self {
        Self {
            provider,
            comment: None,
            dry_run: false,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn reconcile(
        &self,
        fqdn: &str,
        ttl: u32,
        zone_id: &str,
        external_ip: IpAddr,
    ) -> Result<Outcome> {
        if self.is_current(fqdn, zone_id, external_ip).await? {
            info!("IP is already up to date");
            return Ok(Outcome::UpToDate);
        }

        if self.dry_run {
            info!("Record {} needs to point at {}; dry run, not updating", fqdn, external_ip);
            return Ok(Outcome::WouldUpdate);
        }

        info!("Updating resource record {} to {}", fqdn, external_ip);

        let mut change = RecordChange::upsert_a(fqdn, ttl, external_ip);
        if let Some(comment) = &self.comment {
            change = change.with_comment(comment.clone());
        }

        let status = self.provider.upsert_record(zone_id, &change).await?;
        info!("{} change status: {}", self.provider.provider_name(), status);

        Ok(Outcome::Updated { status })
    }

    async fn is_current(&self, fqdn: &str, zone_id: &str, external_ip: IpAddr) -> Result<bool> {
        let records = self
            .provider
            .list_record_sets(zone_id, fqdn, RecordType::A)
            .await?;

        if records.is_empty() {
            info!("No existing records in zone {}", zone_id);
            return Ok(false);
        }

        let matching: Vec<&RecordSet> = records
            .iter()
            .filter(|record| record.is_type(RecordType::A) && same_name(&record.name, fqdn))
            .collect();

        match matching.as_slice() {
            [] => {
                info!("No existing A record for {}", fqdn);
                Ok(false)
            }
            [record] => {
                let current = record.contains(external_ip);
                if !current {
                    info!(
                        "Record {} currently points at {:?} (ttl {:?})",
                        fqdn, record.values, record.ttl
                    );
                }
                Ok(current)
            }
            several => {
                warn!(
                    "Unexpectedly got {} records back for exact name {}: {:?}",
                    several.len(),
                    fqdn,
                    several
                );
                warn!("Continuing on the assumption that an update is needed");
                Ok(false)
            }
        }
    }
}

/// Name equality on the absolute form: the root dot is optional and
/// comparison is ASCII case-insensitive.
fn same_name(stored: &str, fqdn: &str) -> bool {
    let stored = stored.strip_suffix('.').unwrap_or(stored);
    let fqdn = fqdn.strip_suffix('.').unwrap_or(fqdn);
    stored.eq_ignore_ascii_case(fqdn)
}
