mod external;

pub use external::{parse_origin, IpResolver, DEFAULT_IP_SERVICE, DEFAULT_TIMEOUT_SECS};

use std::net::IpAddr;

use async_trait::async_trait;

use crate::error::Result;

/// Source of this host's public address.
#[async_trait]
pub trait IpLookup: Send + Sync {
    async fn resolve_external_ip(&self) -> Result<IpAddr>;
}
