//! Mock NetBoxClient for unit testing
//!
//! This module provides a mock implementation of NetBoxClientTrait that can be used
//! in unit tests without requiring a running NetBox instance.
//!
//! The mock is organized into domain-specific modules:
//! - `ipam.rs` - IPAM operations (prefixes, IP addresses, roles, VLANs)
//! - `dcim.rs` - DCIM operations (sites)
//! - `helpers.rs` - Helper functions for creating nested types
//!
//! Every trait call is appended to a journal so tests can assert which
//! remote calls were made, in which order, and with which payload.

mod dcim;
mod helpers;
mod ipam;

use crate::common::PaginatedResponse;
use crate::common::query::{IpAddressFilter, PrefixFilter, SlugFilter, VlanFilter};
use crate::error::NetBoxError;
use crate::models::*;
use crate::netbox_trait::NetBoxClientTrait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use helpers::Helpers;

/// A remote call observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    ValidateToken,
    ClaimAvailableIp { prefix_id: u64, body: serde_json::Value },
    GetIpAddress { id: u64 },
    ListIpAddresses { filter: IpAddressFilter },
    CreateIpAddress { body: serde_json::Value },
    UpdateIpAddress { id: u64, body: serde_json::Value },
    DeleteIpAddress { id: u64 },
    ListPrefixes { filter: PrefixFilter },
    CreatePrefix { body: serde_json::Value },
    UpdatePrefix { id: u64, body: serde_json::Value },
    DeletePrefix { id: u64 },
    ListSites { filter: SlugFilter },
    ListRoles { filter: SlugFilter },
    ListVlans { filter: VlanFilter },
}

/// Mock NetBoxClient for testing
///
/// This mock stores resources in memory and can be configured to return
/// specific responses for testing different scenarios.
#[derive(Debug, Clone)]
pub struct MockNetBoxClient {
    pub(crate) base_url: String,
    // In-memory storage for resources
    pub(crate) prefixes: Arc<Mutex<BTreeMap<u64, Prefix>>>,
    pub(crate) available_ips: Arc<Mutex<HashMap<u64, VecDeque<String>>>>,
    pub(crate) failing_prefixes: Arc<Mutex<HashMap<u64, String>>>,
    pub(crate) failing_reads: Arc<Mutex<Option<String>>>,
    pub(crate) racing_deletes: Arc<Mutex<bool>>,
    pub(crate) ip_addresses: Arc<Mutex<BTreeMap<u64, IPAddress>>>,
    pub(crate) sites: Arc<Mutex<Vec<Site>>>,
    pub(crate) roles: Arc<Mutex<Vec<Role>>>,
    pub(crate) vlans: Arc<Mutex<Vec<Vlan>>>,
    pub(crate) journal: Arc<Mutex<Vec<MockCall>>>,
    // Counter for generating IDs
    pub(crate) next_id: Arc<Mutex<u64>>,
}

/// Lock a mock store, ignoring poisoning from a panicked test thread
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockNetBoxClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            prefixes: Arc::new(Mutex::new(BTreeMap::new())),
            available_ips: Arc::new(Mutex::new(HashMap::new())),
            failing_prefixes: Arc::new(Mutex::new(HashMap::new())),
            failing_reads: Arc::new(Mutex::new(None)),
            racing_deletes: Arc::new(Mutex::new(false)),
            ip_addresses: Arc::new(Mutex::new(BTreeMap::new())),
            sites: Arc::new(Mutex::new(Vec::new())),
            roles: Arc::new(Mutex::new(Vec::new())),
            vlans: Arc::new(Mutex::new(Vec::new())),
            journal: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Add a prefix with its free addresses, in the order NetBox would hand them out
    pub fn add_prefix(&self, prefix: Prefix, free: &[&str]) {
        lock(&self.available_ips).insert(prefix.id, free.iter().map(|s| s.to_string()).collect());
        lock(&self.prefixes).insert(prefix.id, prefix);
    }

    /// Replace the free addresses of a prefix
    pub fn set_available_ips(&self, prefix_id: u64, free: &[&str]) {
        lock(&self.available_ips).insert(prefix_id, free.iter().map(|s| s.to_string()).collect());
    }

    /// Make every claim against `prefix_id` fail with an API error
    pub fn fail_prefix(&self, prefix_id: u64, message: impl Into<String>) {
        lock(&self.failing_prefixes).insert(prefix_id, message.into());
    }

    /// Make IP address and prefix reads fail with an API error; writes still succeed
    pub fn fail_reads(&self, message: impl Into<String>) {
        *lock(&self.failing_reads) = Some(message.into());
    }

    /// Make deletes lose a race: the object is removed by someone else first
    /// and the delete itself answers 404
    pub fn race_deletes(&self) {
        *lock(&self.racing_deletes) = true;
    }

    pub(crate) fn read_failure(&self) -> Result<(), NetBoxError> {
        match lock(&self.failing_reads).as_ref() {
            Some(message) => Err(NetBoxError::Api(message.clone())),
            None => Ok(()),
        }
    }

    pub(crate) fn deletes_race(&self) -> bool {
        *lock(&self.racing_deletes)
    }

    /// Add an IP address to the mock store (for test setup)
    pub fn add_ip_address(&self, ip: IPAddress) {
        lock(&self.ip_addresses).insert(ip.id, ip);
    }

    /// Remove an IP address behind the caller's back, as another NetBox user would
    pub fn remove_ip_address(&self, id: u64) -> Option<IPAddress> {
        lock(&self.ip_addresses).remove(&id)
    }

    /// Current copy of a stored IP address
    pub fn ip_address(&self, id: u64) -> Option<IPAddress> {
        lock(&self.ip_addresses).get(&id).cloned()
    }

    /// Current copy of a stored prefix
    pub fn prefix(&self, id: u64) -> Option<Prefix> {
        lock(&self.prefixes).get(&id).cloned()
    }

    /// Add a site to the mock store (for test setup)
    pub fn add_site(&self, site: Site) {
        lock(&self.sites).push(site);
    }

    /// Add a role to the mock store (for test setup)
    pub fn add_role(&self, role: Role) {
        lock(&self.roles).push(role);
    }

    /// Add a VLAN to the mock store (for test setup)
    pub fn add_vlan(&self, vlan: Vlan) {
        lock(&self.vlans).push(vlan);
    }

    /// Every call made so far, oldest first
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.journal).clone()
    }

    /// Prefix IDs of every claim attempt, in order
    pub fn claim_attempts(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::ClaimAvailableIp { prefix_id, .. } => Some(prefix_id),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded calls, keeping the stored resources
    pub fn clear_calls(&self) {
        lock(&self.journal).clear();
    }

    pub(crate) fn record(&self, call: MockCall) {
        lock(&self.journal).push(call);
    }

    /// Generate next ID
    pub(crate) fn next_id(&self) -> u64 {
        let mut id = lock(&self.next_id);
        let current = *id;
        *id += 1;
        current
    }

    /// Get helpers instance
    pub fn helpers(&self) -> Helpers {
        Helpers::new(self.base_url.clone())
    }
}

/// JSON form of a request body as it would go over the wire
pub(crate) fn wire<T: serde::Serialize>(body: &T) -> serde_json::Value {
    serde_json::to_value(body).unwrap_or(serde_json::Value::Null)
}

#[async_trait::async_trait]
impl NetBoxClientTrait for MockNetBoxClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn validate_token(&self) -> Result<(), NetBoxError> {
        self.record(MockCall::ValidateToken);
        Ok(())
    }

    async fn claim_available_ip(&self, prefix_id: u64, body: &WritableIPAddress) -> Result<ClaimOutcome, NetBoxError> {
        ipam::claim_available_ip(self, prefix_id, body).await
    }

    async fn get_ip_address(&self, id: u64) -> Result<IPAddress, NetBoxError> {
        ipam::get_ip_address(self, id).await
    }

    async fn list_ip_addresses(&self, filter: &IpAddressFilter) -> Result<PaginatedResponse<IPAddress>, NetBoxError> {
        ipam::list_ip_addresses(self, filter).await
    }

    async fn create_ip_address(&self, body: &WritableIPAddress) -> Result<IPAddress, NetBoxError> {
        ipam::create_ip_address(self, body).await
    }

    async fn update_ip_address(&self, id: u64, body: &WritableIPAddress) -> Result<IPAddress, NetBoxError> {
        ipam::update_ip_address(self, id, body).await
    }

    async fn delete_ip_address(&self, id: u64) -> Result<(), NetBoxError> {
        ipam::delete_ip_address(self, id).await
    }

    async fn list_prefixes(&self, filter: &PrefixFilter) -> Result<PaginatedResponse<Prefix>, NetBoxError> {
        ipam::list_prefixes(self, filter).await
    }

    async fn query_prefixes(&self, filter: &PrefixFilter) -> Result<Vec<Prefix>, NetBoxError> {
        ipam::list_prefixes(self, filter).await.map(|page| page.results)
    }

    async fn create_prefix(&self, body: &WritablePrefix) -> Result<Prefix, NetBoxError> {
        ipam::create_prefix(self, body).await
    }

    async fn update_prefix(&self, id: u64, body: &WritablePrefix) -> Result<Prefix, NetBoxError> {
        ipam::update_prefix(self, id, body).await
    }

    async fn delete_prefix(&self, id: u64) -> Result<(), NetBoxError> {
        ipam::delete_prefix(self, id).await
    }

    async fn list_sites(&self, filter: &SlugFilter) -> Result<PaginatedResponse<Site>, NetBoxError> {
        dcim::list_sites(self, filter).await
    }

    async fn list_roles(&self, filter: &SlugFilter) -> Result<PaginatedResponse<Role>, NetBoxError> {
        ipam::list_roles(self, filter).await
    }

    async fn list_vlans(&self, filter: &VlanFilter) -> Result<PaginatedResponse<Vlan>, NetBoxError> {
        ipam::list_vlans(self, filter).await
    }
}
