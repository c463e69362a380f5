//! IP addresses with a caller-chosen address

use crate::attributes::{Allocation, AllocationAttributes, AttributeChange};
use crate::error::ProviderError;
use crate::helpers::{contains_id, take_by_id};
use crate::validation::{self, ValidationError};
use netbox_client::{IpAddressFilter, NetBoxClientTrait, WritableIPAddress};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const RESOURCE_NAME: &str = "netbox_ipam_ip_addresses";

/// Desired state of an IP address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpAddressConfig {
    pub address: String,
    #[serde(flatten)]
    pub attributes: AllocationAttributes,
}

impl IpAddressConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            attributes: AllocationAttributes::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_address("address", &self.address)?;
        self.attributes.validate()
    }

    fn to_writable(&self) -> WritableIPAddress {
        WritableIPAddress {
            address: Some(self.address.clone()),
            ..self.attributes.to_writable()
        }
    }
}

/// A changed field of an IP address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpAddressChange {
    Address(String),
    Attribute(AttributeChange),
}

impl From<AttributeChange> for IpAddressChange {
    fn from(change: AttributeChange) -> Self {
        Self::Attribute(change)
    }
}

impl IpAddressChange {
    pub fn diff(old: &IpAddressConfig, new: &IpAddressConfig) -> Vec<IpAddressChange> {
        let mut changes = Vec::new();
        if old.address != new.address {
            changes.push(Self::Address(new.address.clone()));
        }
        changes.extend(
            AttributeChange::diff(&old.attributes, &new.attributes)
                .into_iter()
                .map(Self::Attribute),
        );
        changes
    }

    fn patch_body(changes: &[IpAddressChange]) -> Result<WritableIPAddress, ValidationError> {
        let mut body = WritableIPAddress::default();
        for change in changes {
            match change {
                Self::Address(address) => {
                    validation::validate_address("address", address)?;
                    body.address = Some(address.clone());
                }
                Self::Attribute(change) => change.apply(&mut body)?,
            }
        }
        Ok(body)
    }
}

/// CRUD over `/api/ipam/ip-addresses/`
#[derive(Clone)]
pub struct IpAddressResource {
    client: Arc<dyn NetBoxClientTrait>,
}

impl IpAddressResource {
    pub fn new(client: Arc<dyn NetBoxClientTrait>) -> Self {
        Self { client }
    }

    pub async fn create(&self, config: &IpAddressConfig) -> Result<Allocation, ProviderError> {
        config.validate()?;

        let created = self.client.create_ip_address(&config.to_writable()).await?;
        info!("Created IP address {} (ID: {})", created.address, created.id);

        let mut id = Some(created.id);
        match self.read(&mut id).await {
            Ok(Some(allocation)) => Ok(allocation),
            Ok(None) => Ok(Allocation::from_remote(&created)),
            Err(e) => {
                warn!("Failed to read back IP address {} after creating it: {}", created.id, e);
                Ok(Allocation::from_remote(&created))
            }
        }
    }

    /// Look the address up by id; a missing address clears `id`
    pub async fn read(&self, id: &mut Option<u64>) -> Result<Option<Allocation>, ProviderError> {
        let Some(current) = *id else {
            return Ok(None);
        };

        let page = self.client.list_ip_addresses(&IpAddressFilter::by_id(current)).await?;
        match take_by_id(page, current) {
            Some(ip) => Ok(Some(Allocation::from_remote(&ip))),
            None => {
                info!("IP address {} no longer exists in NetBox, forgetting it", current);
                *id = None;
                Ok(None)
            }
        }
    }

    pub async fn update(&self, id: u64, changes: &[IpAddressChange]) -> Result<Allocation, ProviderError> {
        let body = IpAddressChange::patch_body(changes)?;
        if !changes.is_empty() {
            self.client.update_ip_address(id, &body).await?;
            info!("Updated IP address {}", id);
        }

        let ip = self.client.get_ip_address(id).await?;
        Ok(Allocation::from_remote(&ip))
    }

    pub async fn delete(&self, id: u64) -> Result<(), ProviderError> {
        if !self.exists(id).await? {
            debug!("IP address {} already absent", id);
            return Ok(());
        }

        match self.client.delete_ip_address(id).await {
            Ok(()) => {
                info!("Deleted IP address {}", id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!("IP address {} was removed before it could be deleted", id);
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
