//! Helper functions for creating NetBox model types in mock implementations

use crate::models::*;

/// Builds nested references and test fixtures with URLs under one base URL
#[derive(Debug, Clone)]
pub struct Helpers {
    base_url: String,
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

impl Helpers {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    /// Helper to create NestedTag from a tag name
    pub fn create_nested_tag(&self, name: &str) -> NestedTag {
        let slug = slugify(name);
        NestedTag {
            id: 0,
            url: format!("{}/api/extras/tags/?slug={}", self.base_url, slug),
            display: name.to_string(),
            name: name.to_string(),
            slug,
        }
    }

    /// Helper to create NestedTenant
    pub fn create_nested_tenant(&self, id: u64) -> NestedTenant {
        let name = format!("Tenant {}", id);
        NestedTenant {
            id,
            url: format!("{}/api/tenancy/tenants/{}/", self.base_url, id),
            display: name.clone(),
            slug: slugify(&name),
            name,
        }
    }

    /// Helper to create NestedVrf
    pub fn create_nested_vrf(&self, id: u64) -> NestedVrf {
        let name = format!("VRF {}", id);
        NestedVrf {
            id,
            url: format!("{}/api/ipam/vrfs/{}/", self.base_url, id),
            display: name.clone(),
            name,
        }
    }

    /// Helper to create NestedIPAddress
    pub fn create_nested_ip(&self, id: u64) -> NestedIPAddress {
        NestedIPAddress {
            id,
            url: format!("{}/api/ipam/ip-addresses/{}/", self.base_url, id),
            display: String::new(),
            address: String::new(),
        }
    }

    /// Helper to create NestedSite
    pub fn create_nested_site(&self, id: u64) -> NestedSite {
        let name = format!("Site {}", id);
        NestedSite {
            id,
            url: format!("{}/api/dcim/sites/{}/", self.base_url, id),
            display: name.clone(),
            slug: slugify(&name),
            name,
        }
    }

    /// Helper to create NestedRole
    pub fn create_nested_role(&self, id: u64) -> NestedRole {
        let name = format!("Role {}", id);
        NestedRole {
            id,
            url: format!("{}/api/ipam/roles/{}/", self.base_url, id),
            display: name.clone(),
            slug: slugify(&name),
            name,
        }
    }

    /// Helper to create NestedVlan
    pub fn create_nested_vlan(&self, id: u64) -> NestedVlan {
        NestedVlan {
            id,
            url: format!("{}/api/ipam/vlans/{}/", self.base_url, id),
            display: format!("VLAN {}", id),
            vid: 0,
            name: format!("VLAN {}", id),
        }
    }

    /// An active prefix fixture
    pub fn prefix(&self, id: u64, prefix: &str) -> Prefix {
        Prefix {
            id,
            url: format!("{}/api/ipam/prefixes/{}/", self.base_url, id),
            display: prefix.to_string(),
            prefix: prefix.to_string(),
            site: None,
            vrf: None,
            tenant: None,
            vlan: None,
            status: Some(ChoiceValue::new(PrefixStatus::Active, "Active")),
            role: None,
            is_pool: true,
            description: String::new(),
            tags: Vec::new(),
            created: now(),
            last_updated: now(),
        }
    }

    /// An active IP address fixture
    pub fn ip_address(&self, id: u64, address: &str) -> IPAddress {
        IPAddress {
            id,
            url: format!("{}/api/ipam/ip-addresses/{}/", self.base_url, id),
            display: address.to_string(),
            address: address.to_string(),
            vrf: None,
            tenant: None,
            status: Some(ChoiceValue::new(IPAddressStatus::Active, "Active")),
            role: None,
            assigned_object_type: None,
            assigned_object_id: None,
            nat_inside: None,
            nat_outside: Vec::new(),
            dns_name: String::new(),
            description: String::new(),
            tags: Vec::new(),
            created: now(),
            last_updated: now(),
        }
    }

    /// A site fixture
    pub fn site(&self, id: u64, slug: &str) -> Site {
        Site {
            id,
            url: format!("{}/api/dcim/sites/{}/", self.base_url, id),
            display: slug.to_string(),
            name: slug.to_string(),
            slug: slug.to_string(),
            description: String::new(),
        }
    }

    /// A role fixture
    pub fn role(&self, id: u64, slug: &str) -> Role {
        Role {
            id,
            url: format!("{}/api/ipam/roles/{}/", self.base_url, id),
            display: slug.to_string(),
            name: slug.to_string(),
            slug: slug.to_string(),
            description: String::new(),
        }
    }

    /// A VLAN fixture, optionally inside a VLAN group
    pub fn vlan(&self, id: u64, vid: u16, group_id: Option<u64>) -> Vlan {
        Vlan {
            id,
            url: format!("{}/api/ipam/vlans/{}/", self.base_url, id),
            display: format!("VLAN {}", vid),
            site: None,
            group: group_id.map(|group_id| NestedVlanGroup {
                id: group_id,
                url: format!("{}/api/ipam/vlan-groups/{}/", self.base_url, group_id),
                display: format!("Group {}", group_id),
                name: format!("Group {}", group_id),
                slug: format!("group-{}", group_id),
            }),
            vid,
            name: format!("VLAN {}", vid),
            description: String::new(),
        }
    }
}
