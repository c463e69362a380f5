//! NetBoxClient trait for mocking
//!
//! This trait abstracts the NetBoxClient so that callers take it as an
//! injected dependency. The concrete NetBoxClient implements this trait,
//! and tests can use the mock implementation.

use crate::common::PaginatedResponse;
use crate::common::query::{IpAddressFilter, PrefixFilter, SlugFilter, VlanFilter};
use crate::error::NetBoxError;
use crate::models::*;

/// Trait for NetBox API client operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
/// List methods return the first page only, with NetBox's `count`; `query_*`
/// methods follow pagination to the end.
#[async_trait::async_trait]
pub trait NetBoxClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Validate the API token
    async fn validate_token(&self) -> Result<(), NetBoxError>;

    // IP addresses
    /// Ask a prefix to create its next free address with the given attributes.
    /// An exhausted prefix yields `ClaimOutcome::NoCapacity`, not an error.
    async fn claim_available_ip(&self, prefix_id: u64, body: &WritableIPAddress) -> Result<ClaimOutcome, NetBoxError>;
    async fn get_ip_address(&self, id: u64) -> Result<IPAddress, NetBoxError>;
    async fn list_ip_addresses(&self, filter: &IpAddressFilter) -> Result<PaginatedResponse<IPAddress>, NetBoxError>;
    async fn create_ip_address(&self, body: &WritableIPAddress) -> Result<IPAddress, NetBoxError>;
    async fn update_ip_address(&self, id: u64, body: &WritableIPAddress) -> Result<IPAddress, NetBoxError>;
    async fn delete_ip_address(&self, id: u64) -> Result<(), NetBoxError>;

    // Prefixes
    async fn list_prefixes(&self, filter: &PrefixFilter) -> Result<PaginatedResponse<Prefix>, NetBoxError>;
    async fn query_prefixes(&self, filter: &PrefixFilter) -> Result<Vec<Prefix>, NetBoxError>;
    async fn create_prefix(&self, body: &WritablePrefix) -> Result<Prefix, NetBoxError>;
    async fn update_prefix(&self, id: u64, body: &WritablePrefix) -> Result<Prefix, NetBoxError>;
    async fn delete_prefix(&self, id: u64) -> Result<(), NetBoxError>;

    // Lookups
    async fn list_sites(&self, filter: &SlugFilter) -> Result<PaginatedResponse<Site>, NetBoxError>;
    async fn list_roles(&self, filter: &SlugFilter) -> Result<PaginatedResponse<Role>, NetBoxError>;
    async fn list_vlans(&self, filter: &VlanFilter) -> Result<PaginatedResponse<Vlan>, NetBoxError>;
}
