use std::time::Duration;

use async_trait::async_trait;
use aws_config::environment::region::EnvironmentVariableRegionProvider;
use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileRegionProvider;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_route53::error::DisplayErrorContext;
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use aws_sdk_route53::Client;

use super::provider::{DnsProvider, HostedZone, RecordChange, RecordSet, RecordType};
use crate::error::{Error, Result};

const PROVIDER_NAME: &str = "route53";

/// Route53 is global; any region resolves its endpoint.
const FALLBACK_REGION: &str = "us-east-1";

pub struct Route53Provider {
    client: Client,
}

impl Route53Provider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from a named profile in the shared AWS config files.
    /// Profiles that only carry credentials fall back to `us-east-1`.
    pub async fn from_profile(profile: &str, timeout: Duration) -> Self {
        let timeouts = TimeoutConfig::builder().operation_timeout(timeout).build();
        let region = RegionProviderChain::first_try(EnvironmentVariableRegionProvider::new())
            .or_else(ProfileFileRegionProvider::builder().profile_name(profile).build())
            .or_else(Region::new(FALLBACK_REGION));

        let config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(profile)
            .region(region)
            .timeout_config(timeouts)
            .load()
            .await;

        tracing::debug!(
            "Loaded AWS profile {} (region {:?})",
            profile,
            config.region()
        );

        Self::new(Client::new(&config))
    }
}

fn api_error<E>(operation: &str, err: E) -> Error
where
    E: std::error::Error + 'static,
{
    Error::provider(
        PROVIDER_NAME,
        format!("{} failed: {}", operation, DisplayErrorContext(err)),
    )
}

fn rr_type(record_type: RecordType) -> RrType {
    match record_type {
        RecordType::A => RrType::A,
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    async fn list_zones(&self) -> Result<Vec<HostedZone>> {
        let mut zones = Vec::new();
        let mut next_dns_name: Option<String> = None;
        let mut next_zone_id: Option<String> = None;

        loop {
            let output = self
                .client
                .list_hosted_zones_by_name()
                .set_dns_name(next_dns_name.take())
                .set_hosted_zone_id(next_zone_id.take())
                .send()
                .await
                .map_err(|e| api_error("ListHostedZonesByName", e))?;

            zones.extend(
                output
                    .hosted_zones()
                    .iter()
                    .map(|zone| HostedZone::new(zone.id(), zone.name())),
            );

            if !output.is_truncated() {
                break;
            }

            next_dns_name = output.next_dns_name().map(str::to_string);
            next_zone_id = output.next_hosted_zone_id().map(str::to_string);
            if next_dns_name.is_none() {
                break;
            }
        }

        tracing::debug!("Listed {} hosted zones", zones.len());
        Ok(zones)
    }

    async fn list_record_sets(
        &self,
        zone_id: &str,
        start_name: &str,
        start_type: RecordType,
    ) -> Result<Vec<RecordSet>> {
        let output = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(zone_id)
            .start_record_name(start_name)
            .start_record_type(rr_type(start_type))
            .send()
            .await
            .map_err(|e| api_error("ListResourceRecordSets", e))?;

        let records = output
            .resource_record_sets()
            .iter()
            .map(|set| RecordSet {
                name: set.name().to_string(),
                record_type: set.r#type().as_str().to_string(),
                ttl: set.ttl().and_then(|ttl| u32::try_from(ttl).ok()),
                values: set
                    .resource_records()
                    .iter()
                    .map(|record| record.value().to_string())
                    .collect(),
            })
            .collect();

        Ok(records)
    }

    async fn upsert_record(&self, zone_id: &str, change: &RecordChange) -> Result<String> {
        let record = ResourceRecord::builder()
            .value(change.value.to_string())
            .build()
            .map_err(|e| api_error("Building resource record", e))?;

        let record_set = ResourceRecordSet::builder()
            .name(&change.name)
            .r#type(rr_type(change.record_type))
            .ttl(i64::from(change.ttl))
            .resource_records(record)
            .build()
            .map_err(|e| api_error("Building record set", e))?;

        let upsert = Change::builder()
            .action(ChangeAction::Upsert)
            .resource_record_set(record_set)
            .build()
            .map_err(|e| api_error("Building change", e))?;

        let batch = ChangeBatch::builder()
            .set_comment(change.comment.clone())
            .changes(upsert)
            .build()
            .map_err(|e| api_error("Building change batch", e))?;

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| api_error("ChangeResourceRecordSets", e))?;

        let status = output
            .change_info()
            .map(|info| info.status().as_str().to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string());

        Ok(status)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
