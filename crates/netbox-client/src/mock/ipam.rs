//! IPAM operations for MockNetBoxClient
//!
//! Handles prefixes, IP addresses, roles and VLANs

use super::{MockCall, MockNetBoxClient, lock, wire};
use crate::common::PaginatedResponse;
use crate::common::query::{IpAddressFilter, PrefixFilter, SlugFilter, VlanFilter};
use crate::error::NetBoxError;
use crate::models::*;

/// Copy every field set in `body` onto a stored IP address
fn apply_ip_body(client: &MockNetBoxClient, ip: &mut IPAddress, body: &WritableIPAddress) {
    let helpers = client.helpers();

    if let Some(address) = &body.address {
        ip.address = address.clone();
        ip.display = address.clone();
    }
    if let Some(description) = &body.description {
        ip.description = description.clone();
    }
    if let Some(dns_name) = &body.dns_name {
        ip.dns_name = dns_name.clone();
    }
    if let Some(status) = body.status {
        ip.status = Some(ChoiceValue::new(status, status.as_str()));
    }
    if let Some(role) = body.role {
        ip.role = role.map(|role| ChoiceValue::new(role, role.as_str()));
    }
    if let Some(object_type) = &body.assigned_object_type {
        ip.assigned_object_type = object_type.clone();
    }
    if let Some(object_id) = body.assigned_object_id {
        ip.assigned_object_id = object_id;
    }
    if let Some(nat_inside) = body.nat_inside {
        ip.nat_inside = nat_inside.map(|id| helpers.create_nested_ip(id));
    }
    if let Some(nat_outside) = body.nat_outside {
        ip.nat_outside = nat_outside.map(|id| helpers.create_nested_ip(id)).into_iter().collect();
    }
    if let Some(tenant) = body.tenant {
        ip.tenant = tenant.map(|id| helpers.create_nested_tenant(id));
    }
    if let Some(vrf) = body.vrf {
        ip.vrf = vrf.map(|id| helpers.create_nested_vrf(id));
    }
    if let Some(tags) = &body.tags {
        ip.tags = tags.iter().map(|tag| helpers.create_nested_tag(&tag.name)).collect();
    }
}

pub async fn claim_available_ip(client: &MockNetBoxClient, prefix_id: u64, body: &WritableIPAddress) -> Result<ClaimOutcome, NetBoxError> {
    client.record(MockCall::ClaimAvailableIp { prefix_id, body: wire(body) });

    if let Some(message) = lock(&client.failing_prefixes).get(&prefix_id) {
        return Err(NetBoxError::Api(message.clone()));
    }

    let prefix = lock(&client.prefixes).get(&prefix_id).cloned();
    let Some(prefix) = prefix else {
        return Err(NetBoxError::NotFound(format!("Prefix {} not found", prefix_id)));
    };

    let next = lock(&client.available_ips)
        .get_mut(&prefix_id)
        .and_then(|free| free.pop_front());
    let Some(address) = next else {
        return Ok(ClaimOutcome::NoCapacity);
    };

    let id = client.next_id();
    let mut ip = client.helpers().ip_address(id, &address);
    ip.vrf = prefix.vrf.clone();
    // NetBox ignores any address in the body and uses the one it picked
    let body = WritableIPAddress { address: None, ..body.clone() };
    apply_ip_body(client, &mut ip, &body);

    lock(&client.ip_addresses).insert(id, ip.clone());
    Ok(ClaimOutcome::Claimed(ip))
}

pub async fn get_ip_address(client: &MockNetBoxClient, id: u64) -> Result<IPAddress, NetBoxError> {
    client.record(MockCall::GetIpAddress { id });
    client.read_failure()?;
    client.ip_address(id)
        .ok_or_else(|| NetBoxError::NotFound(format!("IP address {} not found", id)))
}

pub async fn list_ip_addresses(client: &MockNetBoxClient, filter: &IpAddressFilter) -> Result<PaginatedResponse<IPAddress>, NetBoxError> {
    client.record(MockCall::ListIpAddresses { filter: filter.clone() });
    client.read_failure()?;

    let results = lock(&client.ip_addresses)
        .values()
        .filter(|ip| filter.id.is_none_or(|id| ip.id == id))
        .filter(|ip| filter.address.as_ref().is_none_or(|address| &ip.address == address))
        .cloned()
        .collect();
    Ok(PaginatedResponse::single_page(results))
}

pub async fn create_ip_address(client: &MockNetBoxClient, body: &WritableIPAddress) -> Result<IPAddress, NetBoxError> {
    client.record(MockCall::CreateIpAddress { body: wire(body) });

    let Some(address) = &body.address else {
        return Err(NetBoxError::InvalidRequest("address: This field is required.".to_string()));
    };

    let id = client.next_id();
    let mut ip = client.helpers().ip_address(id, address);
    apply_ip_body(client, &mut ip, body);

    lock(&client.ip_addresses).insert(id, ip.clone());
    Ok(ip)
}

pub async fn update_ip_address(client: &MockNetBoxClient, id: u64, body: &WritableIPAddress) -> Result<IPAddress, NetBoxError> {
    client.record(MockCall::UpdateIpAddress { id, body: wire(body) });

    let mut ips = lock(&client.ip_addresses);
    let ip = ips
        .get_mut(&id)
        .ok_or_else(|| NetBoxError::NotFound(format!("IP address {} not found", id)))?;
    apply_ip_body(client, ip, body);
    ip.last_updated = chrono::Utc::now().to_rfc3339();
    Ok(ip.clone())
}

pub async fn delete_ip_address(client: &MockNetBoxClient, id: u64) -> Result<(), NetBoxError> {
    client.record(MockCall::DeleteIpAddress { id });
    let removed = lock(&client.ip_addresses).remove(&id);
    removed
        .filter(|_| !client.deletes_race())
        .ok_or_else(|| NetBoxError::NotFound(format!("IP address {} not found", id)))
        .map(|_| ())
}

/// Copy every field set in `body` onto a stored prefix
fn apply_prefix_body(client: &MockNetBoxClient, prefix: &mut Prefix, body: &WritablePrefix) {
    let helpers = client.helpers();

    if let Some(cidr) = &body.prefix {
        prefix.prefix = cidr.clone();
        prefix.display = cidr.clone();
    }
    if let Some(description) = &body.description {
        prefix.description = description.clone();
    }
    if let Some(is_pool) = body.is_pool {
        prefix.is_pool = is_pool;
    }
    if let Some(status) = body.status {
        prefix.status = Some(ChoiceValue::new(status, status.as_str()));
    }
    if let Some(site) = body.site {
        prefix.site = site.map(|id| helpers.create_nested_site(id));
    }
    if let Some(role) = body.role {
        prefix.role = role.map(|id| helpers.create_nested_role(id));
    }
    if let Some(tenant) = body.tenant {
        prefix.tenant = tenant.map(|id| helpers.create_nested_tenant(id));
    }
    if let Some(vlan) = body.vlan {
        prefix.vlan = vlan.map(|id| helpers.create_nested_vlan(id));
    }
    if let Some(vrf) = body.vrf {
        prefix.vrf = vrf.map(|id| helpers.create_nested_vrf(id));
    }
    if let Some(tags) = &body.tags {
        prefix.tags = tags.iter().map(|tag| helpers.create_nested_tag(&tag.name)).collect();
    }
}

pub async fn list_prefixes(client: &MockNetBoxClient, filter: &PrefixFilter) -> Result<PaginatedResponse<Prefix>, NetBoxError> {
    client.record(MockCall::ListPrefixes { filter: filter.clone() });
    client.read_failure()?;

    let results = lock(&client.prefixes)
        .values()
        .filter(|prefix| filter.id.is_none_or(|id| prefix.id == id))
        .filter(|prefix| {
            filter.tags.iter().all(|wanted| prefix.tags.iter().any(|tag| &tag.slug == wanted))
        })
        .cloned()
        .collect();
    Ok(PaginatedResponse::single_page(results))
}

pub async fn create_prefix(client: &MockNetBoxClient, body: &WritablePrefix) -> Result<Prefix, NetBoxError> {
    client.record(MockCall::CreatePrefix { body: wire(body) });

    let Some(cidr) = &body.prefix else {
        return Err(NetBoxError::InvalidRequest("prefix: This field is required.".to_string()));
    };

    let id = client.next_id();
    let mut prefix = client.helpers().prefix(id, cidr);
    prefix.is_pool = false;
    apply_prefix_body(client, &mut prefix, body);

    lock(&client.prefixes).insert(id, prefix.clone());
    Ok(prefix)
}

pub async fn update_prefix(client: &MockNetBoxClient, id: u64, body: &WritablePrefix) -> Result<Prefix, NetBoxError> {
    client.record(MockCall::UpdatePrefix { id, body: wire(body) });

    let mut prefixes = lock(&client.prefixes);
    let prefix = prefixes
        .get_mut(&id)
        .ok_or_else(|| NetBoxError::NotFound(format!("Prefix {} not found", id)))?;
    apply_prefix_body(client, prefix, body);
    prefix.last_updated = chrono::Utc::now().to_rfc3339();
    Ok(prefix.clone())
}

pub async fn delete_prefix(client: &MockNetBoxClient, id: u64) -> Result<(), NetBoxError> {
    client.record(MockCall::DeletePrefix { id });
    let removed = lock(&client.prefixes).remove(&id);
    removed
        .filter(|_| !client.deletes_race())
        .ok_or_else(|| NetBoxError::NotFound(format!("Prefix {} not found", id)))
        .map(|_| ())
}

pub async fn list_roles(client: &MockNetBoxClient, filter: &SlugFilter) -> Result<PaginatedResponse<Role>, NetBoxError> {
    client.record(MockCall::ListRoles { filter: filter.clone() });

    let results = lock(&client.roles)
        .iter()
        .filter(|role| filter.slug.as_ref().is_none_or(|slug| &role.slug == slug))
        .cloned()
        .collect();
    Ok(PaginatedResponse::single_page(results))
}

pub async fn list_vlans(client: &MockNetBoxClient, filter: &VlanFilter) -> Result<PaginatedResponse<Vlan>, NetBoxError> {
    client.record(MockCall::ListVlans { filter: filter.clone() });

    let results = lock(&client.vlans)
        .iter()
        .filter(|vlan| filter.vid.is_none_or(|vid| vlan.vid == vid))
        .filter(|vlan| {
            filter.group_id.is_none_or(|group_id| {
                vlan.group.as_ref().is_some_and(|group| group.id == group_id)
            })
        })
        .cloned()
        .collect();
    Ok(PaginatedResponse::single_page(results))
}
