use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use route53_dyndns::{config::Settings, dns::Route53Provider, ip::IpResolver, updater};

#[derive(Parser)]
#[command(name = "route53-dyndns")]
#[command(about = "Manage a dynamic home IP address with an AWS hosted Route53 domain")]
#[command(version)]
struct Cli {
    /// Optional TOML file with the same keys as the flags below
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Domain to modify
    #[arg(short, long)]
    domain: Option<String>,

    /// Record to modify (the apex domain when omitted)
    #[arg(short, long)]
    record: Option<String>,

    /// AWS hosted zone id
    #[arg(short, long)]
    zone: Option<String>,

    /// AWS credential profile [default: ddns]
    #[arg(short, long)]
    profile: Option<String>,

    /// Record TTL in seconds [default: 300]
    #[arg(long)]
    ttl: Option<u32>,

    /// Endpoint returning {"origin": "<ip>"} [default: http://httpbin.org/ip]
    #[arg(long)]
    ip_service: Option<String>,

    /// Network timeout in seconds [default: 10]
    #[arg(long)]
    timeout: Option<u64>,

    /// Log level, overridden by RUST_LOG [default: info]
    #[arg(long)]
    log_level: Option<String>,

    /// Report what would change without writing
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn into_settings(self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };

        if let Some(domain) = self.domain {
            settings.domain = domain;
        }
        if let Some(record) = self.record {
            settings.record = Some(record);
        }
        if let Some(zone) = self.zone {
            settings.zone_id = Some(zone);
        }
        if let Some(profile) = self.profile {
            settings.profile = profile;
        }
        if let Some(ttl) = self.ttl {
            settings.ttl = ttl;
        }
        if let Some(ip_service) = self.ip_service {
            settings.ip_service = ip_service;
        }
        if let Some(timeout) = self.timeout {
            settings.timeout_seconds = timeout;
        }
        if let Some(log_level) = self.log_level {
            settings.log_level = log_level;
        }
        settings.dry_run |= self.dry_run;

        settings.validate()?;
        Ok(settings)
    }
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Cli::parse().into_settings()?;

    init_logging(&settings.log_level);

    let resolver = IpResolver::with_timeout(settings.ip_service.as_str(), settings.timeout())?;
    let provider = Route53Provider::from_profile(&settings.profile, settings.timeout()).await;

    updater::run(&settings, &provider, &resolver)
        .await
        .with_context(|| format!("Failed to update DNS record for {}", settings.fqdn()))?;

    Ok(())
}
