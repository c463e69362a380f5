//! Read-only lookups
//!
//! Each lookup builds one filter, lists, and (except for prefixes) requires
//! exactly one match.
//!
//! | Data source | Looks up |
//! |---|---|
//! | `netbox_dcim_site` | site by slug |
//! | `netbox_ipam_role` | role by slug |
//! | `netbox_ipam_vlan` | VLAN by VID, optionally inside a VLAN group |
//! | `netbox_ipam_ip_addresses` | IP address by address |
//! | `netbox_ipam_prefixes` | every prefix carrying a set of tags |

mod ip_address;
mod prefixes;
mod role;
mod site;
mod vlan;

pub use prefixes::PrefixIds;

use netbox_client::NetBoxClientTrait;
use std::sync::Arc;

pub const SITE: &str = "netbox_dcim_site";
pub const ROLE: &str = "netbox_ipam_role";
pub const VLAN: &str = "netbox_ipam_vlan";
pub const IP_ADDRESSES: &str = "netbox_ipam_ip_addresses";
pub const PREFIXES: &str = "netbox_ipam_prefixes";

/// Every data source name
pub const ALL: &[&str] = &[SITE, ROLE, VLAN, IP_ADDRESSES, PREFIXES];

/// Lookups against one NetBox
#[derive(Clone)]
pub struct DataSources {
    client: Arc<dyn NetBoxClientTrait>,
}

impl DataSources {
    pub fn new(client: Arc<dyn NetBoxClientTrait>) -> Self {
        Self { client }
    }
}
