//! Prefixes managed directly by the caller
//!
//! A prefix created here can be handed to the pooled allocator as a pool.

use crate::error::ProviderError;
use crate::helpers::{contains_id, take_by_id};
use crate::validation::{self, ValidationError};
use netbox_client::{NetBoxClientTrait, Prefix, PrefixFilter, PrefixStatus, TagRef, WritablePrefix};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const RESOURCE_NAME: &str = "netbox_ipam_prefix";

/// Desired state of a prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixConfig {
    pub prefix: String,
    pub description: Option<String>,
    pub is_pool: bool,
    pub role_id: Option<u64>,
    pub site_id: Option<u64>,
    pub status: PrefixStatus,
    pub tags: BTreeSet<String>,
    pub tenant_id: Option<u64>,
    pub vlan_id: Option<u64>,
    pub vrf_id: Option<u64>,
}

impl PrefixConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            description: None,
            is_pool: false,
            role_id: None,
            site_id: None,
            status: PrefixStatus::Active,
            tags: BTreeSet::new(),
            tenant_id: None,
            vlan_id: None,
            vrf_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_cidr_network("prefix", &self.prefix)?;
        if let Some(description) = &self.description {
            validation::validate_description("description", description)?;
        }
        Ok(())
    }

    fn to_writable(&self) -> WritablePrefix {
        WritablePrefix {
            prefix: Some(self.prefix.clone()),
            description: self.description.clone(),
            is_pool: Some(self.is_pool),
            status: Some(self.status),
            site: self.site_id.map(Some),
            role: self.role_id.map(Some),
            tenant: self.tenant_id.map(Some),
            vlan: self.vlan_id.map(Some),
            vrf: self.vrf_id.map(Some),
            tags: (!self.tags.is_empty()).then(|| TagRef::from_names(self.tags.iter().cloned())),
        }
    }

    fn from_remote(prefix: &Prefix) -> Self {
        Self {
            prefix: prefix.prefix.clone(),
            description: (!prefix.description.is_empty()).then(|| prefix.description.clone()),
            is_pool: prefix.is_pool,
            role_id: prefix.role.as_ref().map(|role| role.id),
            site_id: prefix.site.as_ref().map(|site| site.id),
            status: prefix
                .status
                .as_ref()
                .map(|status| status.value)
                .unwrap_or(PrefixStatus::Active),
            tags: prefix.tags.iter().map(|tag| tag.name.clone()).collect(),
            tenant_id: prefix.tenant.as_ref().map(|tenant| tenant.id),
            vlan_id: prefix.vlan.as_ref().map(|vlan| vlan.id),
            vrf_id: prefix.vrf.as_ref().map(|vrf| vrf.id),
        }
    }
}

/// A prefix as it exists in NetBox
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixRecord {
    pub id: u64,
    #[serde(flatten)]
    pub config: PrefixConfig,
}

impl PrefixRecord {
    pub fn from_remote(prefix: &Prefix) -> Self {
        Self {
            id: prefix.id,
            config: PrefixConfig::from_remote(prefix),
        }
    }
}

/// A changed field of a prefix; `None` clears it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixChange {
    Prefix(String),
    Description(Option<String>),
    IsPool(bool),
    Role(Option<u64>),
    Site(Option<u64>),
    Status(PrefixStatus),
    Tags(BTreeSet<String>),
    Tenant(Option<u64>),
    Vlan(Option<u64>),
    Vrf(Option<u64>),
}

impl PrefixChange {
    pub fn diff(old: &PrefixConfig, new: &PrefixConfig) -> Vec<PrefixChange> {
        let mut changes = Vec::new();
        if old.prefix != new.prefix {
            changes.push(Self::Prefix(new.prefix.clone()));
        }
        if old.description != new.description {
            changes.push(Self::Description(new.description.clone()));
        }
        if old.is_pool != new.is_pool {
            changes.push(Self::IsPool(new.is_pool));
        }
        if old.role_id != new.role_id {
            changes.push(Self::Role(new.role_id));
        }
        if old.site_id != new.site_id {
            changes.push(Self::Site(new.site_id));
        }
        if old.status != new.status {
            changes.push(Self::Status(new.status));
        }
        if old.tags != new.tags {
            changes.push(Self::Tags(new.tags.clone()));
        }
        if old.tenant_id != new.tenant_id {
            changes.push(Self::Tenant(new.tenant_id));
        }
        if old.vlan_id != new.vlan_id {
            changes.push(Self::Vlan(new.vlan_id));
        }
        if old.vrf_id != new.vrf_id {
            changes.push(Self::Vrf(new.vrf_id));
        }
        changes
    }

    pub fn patch_body(changes: &[PrefixChange]) -> Result<WritablePrefix, ValidationError> {
        let mut body = WritablePrefix::default();
        for change in changes {
            match change {
                Self::Prefix(prefix) => {
                    validation::validate_cidr_network("prefix", prefix)?;
                    body.prefix = Some(prefix.clone());
                }
                Self::Description(description) => {
                    if let Some(description) = description {
                        validation::validate_description("description", description)?;
                    }
                    body.description = Some(description.clone().unwrap_or_default());
                }
                Self::IsPool(is_pool) => body.is_pool = Some(*is_pool),
                Self::Role(id) => body.role = Some(*id),
                Self::Site(id) => body.site = Some(*id),
                Self::Status(status) => body.status = Some(*status),
                Self::Tags(tags) => body.tags = Some(TagRef::from_names(tags.iter().cloned())),
                Self::Tenant(id) => body.tenant = Some(*id),
                Self::Vlan(id) => body.vlan = Some(*id),
                Self::Vrf(id) => body.vrf = Some(*id),
            }
        }
        Ok(body)
    }
}

/// CRUD over `/api/ipam/prefixes/`
#[derive(Clone)]
pub struct PrefixResource {
    client: Arc<dyn NetBoxClientTrait>,
}

impl PrefixResource {
    pub fn new(client: Arc<dyn NetBoxClientTrait>) -> Self {
        Self { client }
    }

    pub async fn create(&self, config: &PrefixConfig) -> Result<PrefixRecord, ProviderError> {
        config.validate()?;

        let created = self.client.create_prefix(&config.to_writable()).await?;
        info!("Created prefix {} (ID: {})", created.prefix, created.id);

        let mut id = Some(created.id);
        match self.read(&mut id).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Ok(PrefixRecord::from_remote(&created)),
            Err(e) => {
                warn!("Failed to read back prefix {} after creating it: {}", created.id, e);
                Ok(PrefixRecord::from_remote(&created))
            }
        }
    }

    /// Look the prefix up by id; a missing prefix clears `id`
    pub async fn read(&self, id: &mut Option<u64>) -> Result<Option<PrefixRecord>, ProviderError> {
        let Some(current) = *id else {
            return Ok(None);
        };

        let page = self.client.list_prefixes(&PrefixFilter::by_id(current)).await?;
        match take_by_id(page, current) {
            Some(prefix) => Ok(Some(PrefixRecord::from_remote(&prefix))),
            None => {
                info!("Prefix {} no longer exists in NetBox, forgetting it", current);
                *id = None;
                Ok(None)
            }
        }
    }

    pub async fn update(&self, id: u64, changes: &[PrefixChange]) -> Result<PrefixRecord, ProviderError> {
        let body = PrefixChange::patch_body(changes)?;
        if !changes.is_empty() {
            self.client.update_prefix(id, &body).await?;
            info!("Updated prefix {}", id);
        }

        let mut current = Some(id);
        self.read(&mut current).await?.ok_or_else(|| {
            ProviderError::Remote(netbox_client::NetBoxError::NotFound(format!("Prefix {} not found", id)))
        })
    }

    pub async fn delete(&self, id: u64) -> Result<(), ProviderError> {
        if !self.exists(id).await? {
            debug!("Prefix {} already absent", id);
            return Ok(());
        }

        match self.client.delete_prefix(id).await {
            Ok(()) => {
                info!("Deleted prefix {}", id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!("Prefix {} was removed before it could be deleted", id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(&self, id: u64) -> Result<bool, ProviderError> {
        let page = self.client.list_prefixes(&PrefixFilter::by_id(id)).await?;
        Ok(contains_id(&page, id))
    }
}
