//! In-memory test doubles for reconciliation contract tests.

#![allow(dead_code)]

use std::net::IpAddr;
use std::sync::Mutex;

use async_trait::async_trait;
use route53_dyndns::dns::{DnsProvider, HostedZone, RecordChange, RecordSet, RecordType};
use route53_dyndns::ip::IpLookup;
use route53_dyndns::{Error, Result};

/// A provider backed by a record list that applies upserts to itself, so
/// repeated passes observe earlier writes.
pub struct FakeProvider {
    zones: Vec<HostedZone>,
    records: Mutex<Vec<RecordSet>>,
    upserts: Mutex<Vec<(String, RecordChange)>>,
    list_calls: Mutex<Vec<(String, String)>>,
    upsert_attempts: Mutex<usize>,
    fail_reads: bool,
    fail_writes: bool,
}

impl FakeProvider {
    pub fn new(records: Vec<RecordSet>) -> Self {
        Self {
            zones: vec![HostedZone::new("/hostedzone/ZEXAMPLE", "example.com.")],
            records: Mutex::new(records),
            upserts: Mutex::new(Vec::new()),
            list_calls: Mutex::new(Vec::new()),
            upsert_attempts: Mutex::new(0),
            fail_reads: false,
            fail_writes: false,
        }
    }

    /// Make `list_record_sets` fail with a provider error
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Make `upsert_record` fail with a provider error
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Upsert calls including failed ones
    pub fn upsert_attempts(&self) -> usize {
        *self.upsert_attempts.lock().unwrap()
    }

    pub fn with_zones(mut self, zones: Vec<HostedZone>) -> Self {
        self.zones = zones;
        self
    }

    pub fn upserts(&self) -> Vec<(String, RecordChange)> {
        self.upserts.lock().unwrap().clone()
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.lock().unwrap().len()
    }

    pub fn list_calls(&self) -> Vec<(String, String)> {
        self.list_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsProvider for FakeProvider {
    async fn list_zones(&self) -> Result<Vec<HostedZone>> {
        Ok(self.zones.clone())
    }

    async fn list_record_sets(
        &self,
        zone_id: &str,
        start_name: &str,
        _start_type: RecordType,
    ) -> Result<Vec<RecordSet>> {
        self.list_calls
            .lock()
            .unwrap()
            .push((zone_id.to_string(), start_name.to_string()));
        if self.fail_reads {
            return Err(Error::provider("fake", "ListResourceRecordSets throttled"));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn upsert_record(&self, zone_id: &str, change: &RecordChange) -> Result<String> {
        *self.upsert_attempts.lock().unwrap() += 1;
        if self.fail_writes {
            return Err(Error::provider("fake", "ChangeResourceRecordSets access denied"));
        }

        self.upserts
            .lock()
            .unwrap()
            .push((zone_id.to_string(), change.clone()));

        let absolute = format!("{}.", change.name);
        let mut records = self.records.lock().unwrap();
        records.retain(|r| !(r.name == absolute && r.record_type == "A"));
        records.push(a_record(&absolute, &[&change.value.to_string()]));

        Ok("PENDING".to_string())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// An IP lookup that always answers with the same address.
pub struct FixedIp(pub IpAddr);

#[async_trait]
impl IpLookup for FixedIp {
    async fn resolve_external_ip(&self) -> Result<IpAddr> {
        Ok(self.0)
    }
}

pub fn a_record(name: &str, values: &[&str]) -> RecordSet {
    RecordSet {
        name: name.to_string(),
        record_type: "A".to_string(),
        ttl: Some(300),
        values: values.iter().map(|v| v.to_string()).collect(),
    }
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}
