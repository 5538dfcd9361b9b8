mod reconciler;

pub use reconciler::{Outcome, Reconciler};

use tracing::info;

use crate::config::Settings;
use crate::dns::{resolve_zone_id, DnsProvider};
use crate::error::{Error, Result};
use crate::ip::IpLookup;

/// Runs one reconciliation pass: resolve the public address, find the zone
/// if none is configured, then bring the record in line.
pub async fn run(
    settings: &Settings,
    provider: &dyn DnsProvider,
    resolver: &dyn IpLookup,
) -> Result<Outcome> {
    settings.validate()?;

    let fqdn = settings.fqdn();
    info!("Using full record name: {}", fqdn);

    let external_ip = resolver.resolve_external_ip().await?;
    if !external_ip.is_ipv4() {
        return Err(Error::network(format!(
            "External address {} is not IPv4 and cannot be stored in an A record",
            external_ip
        )));
    }

    let zone_id = match settings.zone_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => resolve_zone_id(provider, &settings.domain).await?,
    };

    let outcome = Reconciler::new(provider)
        .with_comment(settings.comment.as_str())
        .dry_run(settings.dry_run)
        .reconcile(&fqdn, settings.ttl, &zone_id, external_ip)
        .await?;

    info!("{}: {}", fqdn, outcome);
    Ok(outcome)
}
