//! Pooled IP allocation
//!
//! Claims the next free address from the first of several candidate prefixes
//! that still has room. NetBox picks the address and makes the claim atomic;
//! this side only decides which prefix to ask, strictly in caller order.

use crate::attributes::{Allocation, AllocationAttributes, AttributeChange, PoolRef};
use crate::error::ProviderError;
use crate::helpers::contains_id;
use netbox_client::{ClaimOutcome, IpAddressFilter, NetBoxClientTrait};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resource type name of the pooled allocator
pub const RESOURCE_NAME: &str = "netbox_ipam_ip_by_prefix";

/// Allocates IP addresses out of an ordered list of prefixes
#[derive(Clone)]
pub struct PoolAllocator {
    client: Arc<dyn NetBoxClientTrait>,
}

impl std::fmt::Debug for PoolAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolAllocator")
            .field("netbox", &self.client.base_url())
            .finish()
    }
}

impl PoolAllocator {
    pub fn new(client: Arc<dyn NetBoxClientTrait>) -> Self {
        Self { client }
    }

    /// Claim one address from the first pool with capacity.
    ///
    /// Each pool is asked once, in the order given. A pool without capacity
    /// moves the search on; any other remote failure stops it immediately.
    pub async fn claim(
        &self,
        pools: &[PoolRef],
        attributes: &AllocationAttributes,
    ) -> Result<Allocation, ProviderError> {
        if pools.is_empty() {
            return Err(ProviderError::InvalidArgument(
                "at least one prefix is required to allocate from".to_string(),
            ));
        }
        attributes.validate()?;

        let body = attributes.to_writable();
        let mut attempted = Vec::with_capacity(pools.len());

        for pool in pools {
            attempted.push(pool.id);
            match self.client.claim_available_ip(pool.id, &body).await? {
                ClaimOutcome::Claimed(ip) => {
                    info!("Claimed IP address {} (ID: {}) from prefix {}", ip.address, ip.id, pool.id);
                    let mut id = Some(ip.id);
                    return match self.refresh(&mut id).await {
                        Ok(Some(allocation)) => Ok(allocation),
                        // Gone between claim and read; report what NetBox handed out
                        Ok(None) => Ok(Allocation::from_remote(&ip)),
                        // Claimed either way; the caller still needs the id
                        Err(e) => {
                            warn!("Failed to read back IP address {} after claiming it: {}", ip.id, e);
                            Ok(Allocation::from_remote(&ip))
                        }
                    };
                }
                ClaimOutcome::NoCapacity => {
                    debug!("Prefix {} has no free IP address, trying next prefix", pool.id);
                }
            }
        }

        warn!("No free IP address in any of the prefixes {:?}", attempted);
        Err(ProviderError::PoolsExhausted { attempted })
    }

    /// Re-read an allocation.
    ///
    /// When NetBox no longer has the address, `id` is cleared and `Ok(None)`
    /// is returned so the caller can forget it.
    pub async fn refresh(&self, id: &mut Option<u64>) -> Result<Option<Allocation>, ProviderError> {
        let Some(current) = *id else {
            return Ok(None);
        };

        match self.client.get_ip_address(current).await {
            Ok(ip) => Ok(Some(Allocation::from_remote(&ip))),
            Err(e) if e.is_not_found() => {
                info!("IP address {} no longer exists in NetBox, forgetting it", current);
                *id = None;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Apply the marked changes and return the re-read allocation
    pub async fn update(&self, id: u64, changes: &[AttributeChange]) -> Result<Allocation, ProviderError> {
        let body = AttributeChange::patch_body(changes)?;
        if changes.is_empty() {
            debug!("No changes for IP address {}", id);
        } else {
            self.client.update_ip_address(id, &body).await?;
            info!("Updated IP address {} ({} attribute(s))", id, changes.len());
        }

        let ip = self.client.get_ip_address(id).await?;
        Ok(Allocation::from_remote(&ip))
    }

    /// Give an address back to its prefix; an address already gone is fine
    pub async fn release(&self, id: u64) -> Result<(), ProviderError> {
        if !self.exists(id).await? {
            debug!("IP address {} already absent, nothing to release", id);
            return Ok(());
        }

        match self.client.delete_ip_address(id).await {
            Ok(()) => {
                info!("Released IP address {}", id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!("IP address {} was removed before it could be released", id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(&self, id: u64) -> Result<bool, ProviderError> {
        let page = self.client.list_ip_addresses(&IpAddressFilter::by_id(id)).await?;
        Ok(contains_id(&page, id))
    }
}
