use tracing::{info, warn};

use super::provider::DnsProvider;
use crate::error::{Error, Result};

/// Finds the hosted zone for `domain`.
///
/// A zone matches when its name contains `domain` as a substring. When
/// several zones match, the first one in listing order is used and the
/// ambiguity is logged.
pub async fn resolve_zone_id(provider: &dyn DnsProvider, domain: &str) -> Result<String> {
    let zones = provider.list_zones().await?;

    let mut candidates = zones.iter().filter(|zone| zone.name.contains(domain));

    let selected = candidates.next().ok_or_else(|| {
        Error::not_found(format!("No hosted zone matches domain: {}", domain))
    })?;

    let others: Vec<&str> = candidates.map(|zone| zone.name.as_str()).collect();
    if !others.is_empty() {
        warn!(
            "Domain {} matches several hosted zones; using {} ({}), ignoring {:?}",
            domain, selected.name, selected.id, others
        );
    }

    info!(
        "Using {} hosted zone {} ({})",
        provider.provider_name(),
        selected.name,
        selected.id
    );
    Ok(selected.id.clone())
}
