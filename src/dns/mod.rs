mod provider;
mod route53;
mod zone;

pub use provider::{DnsProvider, HostedZone, RecordChange, RecordSet, RecordType};
pub use route53::Route53Provider;
pub use zone::resolve_zone_id;

