//! Caller-facing attributes of an allocated IP address
//!
//! `AllocationAttributes` is the desired state of everything on an IP address
//! except the address itself. It converts to a NetBox request body on the
//! way out and is resolved back from an `IPAddress` on the way in.

use crate::validation::{self, ValidationError};
use netbox_client::{IPAddress, IPAddressRole, IPAddressStatus, TagRef, WritableIPAddress};
use serde::Serialize;
use std::collections::BTreeSet;

/// Object type NetBox uses for device interfaces
pub const INTERFACE_OBJECT_TYPE: &str = "dcim.interface";

/// A candidate prefix to allocate from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PoolRef {
    pub id: u64,
}

impl PoolRef {
    pub fn new(id: u64) -> Self {
        Self { id }
    }
}

impl From<u64> for PoolRef {
    fn from(id: u64) -> Self {
        Self { id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationAttributes {
    pub description: Option<String>,
    pub dns_name: Option<String>,
    pub interface_id: Option<u64>,
    pub nat_inside_id: Option<u64>,
    pub nat_outside_id: Option<u64>,
    pub role: Option<IPAddressRole>,
    pub status: IPAddressStatus,
    pub tags: BTreeSet<String>,
    pub tenant_id: Option<u64>,
    pub vrf_id: Option<u64>,
}

impl Default for AllocationAttributes {
    fn default() -> Self {
        Self {
            description: None,
            dns_name: None,
            interface_id: None,
            nat_inside_id: None,
            nat_outside_id: None,
            role: None,
            status: IPAddressStatus::Active,
            tags: BTreeSet::new(),
            tenant_id: None,
            vrf_id: None,
        }
    }
}

impl AllocationAttributes {
    /// Check every set attribute locally
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(description) = &self.description {
            validation::validate_description("description", description)?;
        }
        if let Some(dns_name) = &self.dns_name {
            validation::validate_dns_name("dns_name", dns_name)?;
        }
        validate_status(self.status)
    }

    /// Request body carrying every set attribute; unset ones are left out
    pub fn to_writable(&self) -> WritableIPAddress {
        WritableIPAddress {
            address: None,
            description: self.description.clone(),
            dns_name: self.dns_name.clone(),
            status: Some(self.status),
            role: self.role.map(Some),
            assigned_object_type: self.interface_id.map(|_| Some(INTERFACE_OBJECT_TYPE.to_string())),
            assigned_object_id: self.interface_id.map(Some),
            nat_inside: self.nat_inside_id.map(Some),
            nat_outside: self.nat_outside_id.map(Some),
            tenant: self.tenant_id.map(Some),
            vrf: self.vrf_id.map(Some),
            tags: (!self.tags.is_empty()).then(|| TagRef::from_names(self.tags.iter().cloned())),
        }
    }

    /// Resolve attributes from an IP address as NetBox returns it
    pub fn from_remote(ip: &IPAddress) -> Self {
        let interface_id = match ip.assigned_object_type.as_deref() {
            Some(INTERFACE_OBJECT_TYPE) => ip.assigned_object_id,
            _ => None,
        };

        Self {
            description: non_blank(&ip.description),
            dns_name: non_blank(&ip.dns_name),
            interface_id,
            nat_inside_id: ip.nat_inside.as_ref().map(|nat| nat.id),
            nat_outside_id: ip.nat_outside.first().map(|nat| nat.id),
            role: ip.role.as_ref().map(|role| role.value),
            status: ip
                .status
                .as_ref()
                .map(|status| status.value)
                .unwrap_or(IPAddressStatus::Active),
            tags: ip.tags.iter().map(|tag| tag.name.clone()).collect(),
            tenant_id: ip.tenant.as_ref().map(|tenant| tenant.id),
            vrf_id: ip.vrf.as_ref().map(|vrf| vrf.id),
        }
    }
}

/// An IP address held by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub id: u64,
    pub address: String,
    #[serde(flatten)]
    pub attributes: AllocationAttributes,
}

impl Allocation {
    pub fn from_remote(ip: &IPAddress) -> Self {
        Self {
            id: ip.id,
            address: ip.address.clone(),
            attributes: AllocationAttributes::from_remote(ip),
        }
    }
}

/// One attribute the caller marked as changed, with its new value.
/// `None` clears the attribute remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeChange {
    Description(Option<String>),
    DnsName(Option<String>),
    Interface(Option<u64>),
    NatInside(Option<u64>),
    NatOutside(Option<u64>),
    Role(Option<IPAddressRole>),
    Status(IPAddressStatus),
    Tags(BTreeSet<String>),
    Tenant(Option<u64>),
    Vrf(Option<u64>),
}

impl AttributeChange {
    /// Changes that turn `old` into `new`, in attribute order
    pub fn diff(old: &AllocationAttributes, new: &AllocationAttributes) -> Vec<AttributeChange> {
        let mut changes = Vec::new();
        if old.description != new.description {
            changes.push(Self::Description(new.description.clone()));
        }
        if old.dns_name != new.dns_name {
            changes.push(Self::DnsName(new.dns_name.clone()));
        }
        if old.interface_id != new.interface_id {
            changes.push(Self::Interface(new.interface_id));
        }
        if old.nat_inside_id != new.nat_inside_id {
            changes.push(Self::NatInside(new.nat_inside_id));
        }
        if old.nat_outside_id != new.nat_outside_id {
            changes.push(Self::NatOutside(new.nat_outside_id));
        }
        if old.role != new.role {
            changes.push(Self::Role(new.role));
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
        if old.vrf_id != new.vrf_id {
            changes.push(Self::Vrf(new.vrf_id));
        }
        changes
    }

    /// Validate the new value and write it into a partial update body
    pub fn apply(&self, body: &mut WritableIPAddress) -> Result<(), ValidationError> {
        match self {
            Self::Description(description) => {
                if let Some(description) = description {
                    validation::validate_description("description", description)?;
                }
                // Blank-able text field: clearing sends an empty string
                body.description = Some(description.clone().unwrap_or_default());
            }
            Self::DnsName(dns_name) => {
                if let Some(dns_name) = dns_name {
                    validation::validate_dns_name("dns_name", dns_name)?;
                }
                body.dns_name = Some(dns_name.clone().unwrap_or_default());
            }
            Self::Interface(interface_id) => {
                body.assigned_object_type = Some(interface_id.map(|_| INTERFACE_OBJECT_TYPE.to_string()));
                body.assigned_object_id = Some(*interface_id);
            }
            Self::NatInside(id) => body.nat_inside = Some(*id),
            Self::NatOutside(id) => body.nat_outside = Some(*id),
            Self::Role(role) => body.role = Some(*role),
            Self::Status(status) => {
                validate_status(*status)?;
                body.status = Some(*status);
            }
            Self::Tags(tags) => body.tags = Some(TagRef::from_names(tags.iter().cloned())),
            Self::Tenant(id) => body.tenant = Some(*id),
            Self::Vrf(id) => body.vrf = Some(*id),
        }
        Ok(())
    }

    /// Partial update body holding exactly the given changes
    pub fn patch_body(changes: &[AttributeChange]) -> Result<WritableIPAddress, ValidationError> {
        let mut body = WritableIPAddress::default();
        for change in changes {
            change.apply(&mut body)?;
        }
        Ok(body)
    }
}

fn validate_status(status: IPAddressStatus) -> Result<(), ValidationError> {
    validation::parse_ip_status("status", status.as_str()).map(|_| ())
}

fn non_blank(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
