//! Keeps a Route53 A record pointed at this host's public IP address.
//!
//! Each call to [`updater::run`] is one independent pass: look up the
//! external address, locate the hosted zone when needed, and upsert the
//! record only if it is stale.

pub mod config;
pub mod dns;
pub mod error;
pub mod ip;
pub mod updater;

pub use error::{Error, Result};
