//! NetBox API client
//!
//! Implements the NetBox REST API client for IPAM operations.
//! Based on NetBox API structure: /api/ipam/prefixes/ and /api/ipam/ip-addresses/

use crate::common::query::{IpAddressFilter, PrefixFilter, SlugFilter, VlanFilter};
use crate::common::{HttpClient, PaginatedResponse};
use crate::error::NetBoxError;
use crate::models::*;
use crate::netbox_trait::NetBoxClientTrait;
use reqwest::{Client, Method, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// NetBox API client
#[derive(Debug, Clone)]
pub struct NetBoxClient {
    http: HttpClient,
}

impl NetBoxClient {
    /// Create a new NetBox client
    ///
    /// # Arguments
    /// * `base_url` - NetBox base URL (e.g., "http://netbox:80")
    /// * `token` - API token for authentication
    pub fn new(base_url: String, token: String) -> Result<Self, NetBoxError> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    /// Create a new NetBox client with an explicit request timeout
    pub fn with_timeout(base_url: String, token: String, timeout: Duration) -> Result<Self, NetBoxError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NetBoxError::Http)?;

        Ok(Self {
            http: HttpClient::new(client, base_url, token),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Validate the API token by making a simple authenticated request.
    ///
    /// Makes a lightweight request to the NetBox status endpoint.
    ///
    /// # Returns
    /// * `Ok(())` - Token is valid and NetBox is reachable
    /// * `Err(NetBoxError::Authentication)` - Token was rejected
    /// * `Err(NetBoxError)` - NetBox is unreachable or failed
    pub async fn validate_token(&self) -> Result<(), NetBoxError> {
        debug!("Validating NetBox token and connectivity");
        let _: serde_json::Value = self.http.get("/api/status/").await?;
        debug!("Token validated successfully");
        Ok(())
    }

    /// Claim the next available IP address from a prefix
    ///
    /// NetBox picks the address and creates the IP address object in one
    /// request, so concurrent claims against the same prefix never receive
    /// the same address.
    ///
    /// # Arguments
    /// * `prefix_id` - Prefix ID to claim from
    /// * `body` - Attributes for the new address; `address` is ignored by NetBox
    ///
    /// # Returns
    /// * `Ok(ClaimOutcome::Claimed(IPAddress))` - The created IP address
    /// * `Ok(ClaimOutcome::NoCapacity)` - The prefix is full (HTTP 204 or 409)
    /// * `Err(NetBoxError)` - Any other failure
    pub async fn claim_available_ip(
        &self,
        prefix_id: u64,
        body: &WritableIPAddress,
    ) -> Result<ClaimOutcome, NetBoxError> {
        let path = format!("/api/ipam/prefixes/{}/available-ips/", prefix_id);
        debug!("Claiming next available IP from prefix {}", prefix_id);

        let response = self.http.send_json(Method::POST, &path, body).await?;

        match response.status() {
            // 204 on NetBox 2.x, 409 "insufficient space" on later releases
            StatusCode::NO_CONTENT | StatusCode::CONFLICT => {
                debug!("Prefix {} has no available IPs ({})", prefix_id, response.status());
                Ok(ClaimOutcome::NoCapacity)
            }
            status if status.is_success() => {
                let value: serde_json::Value = response.json().await?;
                match first_created::<IPAddress>(value)? {
                    Some(ip) => Ok(ClaimOutcome::Claimed(ip)),
                    None => Ok(ClaimOutcome::NoCapacity),
                }
            }
            _ => Err(HttpClient::error_for_status("POST", &path, response).await),
        }
    }

    /// Get an IP address by ID
    ///
    /// # Returns
    /// * `Ok(IPAddress)` - The IP address object
    /// * `Err(NetBoxError::NotFound)` - No IP address with this ID
    pub async fn get_ip_address(&self, id: u64) -> Result<IPAddress, NetBoxError> {
        debug!("Fetching IP address {} from NetBox", id);
        self.http.get(&format!("/api/ipam/ip-addresses/{}/", id)).await
    }

    /// List IP addresses matching a filter (first page)
    pub async fn list_ip_addresses(&self, filter: &IpAddressFilter) -> Result<PaginatedResponse<IPAddress>, NetBoxError> {
        debug!("Querying IP addresses with filter: {:?}", filter);
        self.http.list("ipam/ip-addresses", filter).await
    }

    /// Create an IP address
    pub async fn create_ip_address(&self, body: &WritableIPAddress) -> Result<IPAddress, NetBoxError> {
        debug!("Creating IP address {:?}", body.address);
        self.http.post("/api/ipam/ip-addresses/", body).await
    }

    /// Partially update an IP address; only fields set in `body` are sent
    pub async fn update_ip_address(&self, id: u64, body: &WritableIPAddress) -> Result<IPAddress, NetBoxError> {
        debug!("Updating IP address {}", id);
        self.http.patch(&format!("/api/ipam/ip-addresses/{}/", id), body).await
    }

    /// Delete an IP address
    pub async fn delete_ip_address(&self, id: u64) -> Result<(), NetBoxError> {
        debug!("Deleting IP address {}", id);
        self.http.delete(&format!("/api/ipam/ip-addresses/{}/", id)).await
    }

    /// List prefixes matching a filter (first page)
    pub async fn list_prefixes(&self, filter: &PrefixFilter) -> Result<PaginatedResponse<Prefix>, NetBoxError> {
        debug!("Querying prefixes with filter: {:?}", filter);
        self.http.list("ipam/prefixes", filter).await
    }

    /// Query all prefixes matching a filter, following pagination
    pub async fn query_prefixes(&self, filter: &PrefixFilter) -> Result<Vec<Prefix>, NetBoxError> {
        debug!("Querying all prefixes with filter: {:?}", filter);
        self.http.list_all("ipam/prefixes", filter).await
    }

    /// Create a prefix
    pub async fn create_prefix(&self, body: &WritablePrefix) -> Result<Prefix, NetBoxError> {
        debug!("Creating prefix {:?}", body.prefix);
        self.http.post("/api/ipam/prefixes/", body).await
    }

    /// Partially update a prefix
    pub async fn update_prefix(&self, id: u64, body: &WritablePrefix) -> Result<Prefix, NetBoxError> {
        debug!("Updating prefix {}", id);
        self.http.patch(&format!("/api/ipam/prefixes/{}/", id), body).await
    }

    /// Delete a prefix
    pub async fn delete_prefix(&self, id: u64) -> Result<(), NetBoxError> {
        debug!("Deleting prefix {}", id);
        self.http.delete(&format!("/api/ipam/prefixes/{}/", id)).await
    }

    /// List sites matching a slug
    pub async fn list_sites(&self, filter: &SlugFilter) -> Result<PaginatedResponse<Site>, NetBoxError> {
        self.http.list("dcim/sites", filter).await
    }

    /// List IPAM roles matching a slug
    pub async fn list_roles(&self, filter: &SlugFilter) -> Result<PaginatedResponse<Role>, NetBoxError> {
        self.http.list("ipam/roles", filter).await
    }

    /// List VLANs by VID and optional group
    pub async fn list_vlans(&self, filter: &VlanFilter) -> Result<PaginatedResponse<Vlan>, NetBoxError> {
        self.http.list("ipam/vlans", filter).await
    }
}

#[async_trait::async_trait]
impl NetBoxClientTrait for NetBoxClient {
    fn base_url(&self) -> &str {
        NetBoxClient::base_url(self)
    }

    async fn validate_token(&self) -> Result<(), NetBoxError> {
        NetBoxClient::validate_token(self).await
    }

    async fn claim_available_ip(&self, prefix_id: u64, body: &WritableIPAddress) -> Result<ClaimOutcome, NetBoxError> {
        NetBoxClient::claim_available_ip(self, prefix_id, body).await
    }

    async fn get_ip_address(&self, id: u64) -> Result<IPAddress, NetBoxError> {
        NetBoxClient::get_ip_address(self, id).await
    }

    async fn list_ip_addresses(&self, filter: &IpAddressFilter) -> Result<PaginatedResponse<IPAddress>, NetBoxError> {
        NetBoxClient::list_ip_addresses(self, filter).await
    }

    async fn create_ip_address(&self, body: &WritableIPAddress) -> Result<IPAddress, NetBoxError> {
        NetBoxClient::create_ip_address(self, body).await
    }

    async fn update_ip_address(&self, id: u64, body: &WritableIPAddress) -> Result<IPAddress, NetBoxError> {
        NetBoxClient::update_ip_address(self, id, body).await
    }

    async fn delete_ip_address(&self, id: u64) -> Result<(), NetBoxError> {
        NetBoxClient::delete_ip_address(self, id).await
    }

    async fn list_prefixes(&self, filter: &PrefixFilter) -> Result<PaginatedResponse<Prefix>, NetBoxError> {
        NetBoxClient::list_prefixes(self, filter).await
    }

    async fn query_prefixes(&self, filter: &PrefixFilter) -> Result<Vec<Prefix>, NetBoxError> {
        NetBoxClient::query_prefixes(self, filter).await
    }

    async fn create_prefix(&self, body: &WritablePrefix) -> Result<Prefix, NetBoxError> {
        NetBoxClient::create_prefix(self, body).await
    }

    async fn update_prefix(&self, id: u64, body: &WritablePrefix) -> Result<Prefix, NetBoxError> {
        NetBoxClient::update_prefix(self, id, body).await
    }

    async fn delete_prefix(&self, id: u64) -> Result<(), NetBoxError> {
        NetBoxClient::delete_prefix(self, id).await
    }

    async fn list_sites(&self, filter: &SlugFilter) -> Result<PaginatedResponse<Site>, NetBoxError> {
        NetBoxClient::list_sites(self, filter).await
    }

    async fn list_roles(&self, filter: &SlugFilter) -> Result<PaginatedResponse<Role>, NetBoxError> {
        NetBoxClient::list_roles(self, filter).await
    }

    async fn list_vlans(&self, filter: &VlanFilter) -> Result<PaginatedResponse<Vlan>, NetBoxError> {
        NetBoxClient::list_vlans(self, filter).await
    }
}
