//! NetBox API models
//!
//! Read models match the NetBox REST API serializers.
//! See: netbox/netbox/ipam/api/serializers_/ip.py
//!
//! Writable models only serialize the fields that are set, so the same
//! struct serves as a full create body and as a partial update body.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Choice field as NetBox renders it on read: `{"value": ..., "label": ...}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChoiceValue<T> {
    pub value: T,
    #[serde(default)]
    pub label: String,
}

impl<T> ChoiceValue<T> {
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self { value, label: label.into() }
    }
}

/// Prefix model matching NetBox PrefixSerializer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Prefix {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display: String,
    pub prefix: String, // e.g., "192.168.1.0/24"
    #[serde(default)]
    pub site: Option<NestedSite>,
    #[serde(default)]
    pub vrf: Option<NestedVrf>,
    #[serde(default)]
    pub tenant: Option<NestedTenant>,
    #[serde(default)]
    pub vlan: Option<NestedVlan>,
    #[serde(default)]
    pub status: Option<ChoiceValue<PrefixStatus>>,
    #[serde(default)]
    pub role: Option<NestedRole>,
    #[serde(default)]
    pub is_pool: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<NestedTag>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub last_updated: String,
}

/// IP Address model matching NetBox IPAddressSerializer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IPAddress {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display: String,
    pub address: String, // e.g., "192.168.1.1/24"
    #[serde(default)]
    pub vrf: Option<NestedVrf>,
    #[serde(default)]
    pub tenant: Option<NestedTenant>,
    #[serde(default)]
    pub status: Option<ChoiceValue<IPAddressStatus>>,
    #[serde(default, deserialize_with = "blank_choice")]
    pub role: Option<ChoiceValue<IPAddressRole>>,
    #[serde(default)]
    pub assigned_object_type: Option<String>,
    #[serde(default)]
    pub assigned_object_id: Option<u64>,
    #[serde(default)]
    pub nat_inside: Option<NestedIPAddress>,
    // A single object on older NetBox, a list since 3.2
    #[serde(default, deserialize_with = "one_or_many")]
    pub nat_outside: Vec<NestedIPAddress>,
    #[serde(default)]
    pub dns_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<NestedTag>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub last_updated: String,
}

/// Site model (from DCIM API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Site {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

/// Prefix/VLAN role (from IPAM API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Role {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

/// VLAN model (from IPAM API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Vlan {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub site: Option<NestedSite>,
    #[serde(default)]
    pub group: Option<NestedVlanGroup>,
    pub vid: u16,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// Nested serializers (simplified versions for references)

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedVrf {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedTenant {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedVlan {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display: String,
    pub vid: u16,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedVlanGroup {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedRole {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedSite {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedTag {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedIPAddress {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub address: String,
}

/// Tag reference as accepted by writable serializers
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
}

impl TagRef {
    /// Tag references for a collection of tag names
    pub fn from_names<I, S>(names: I) -> Vec<TagRef>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(|name| TagRef { name: name.into() }).collect()
    }
}

/// Request body for creating, claiming or patching an IP address.
///
/// `None` leaves a field out of the payload. For nullable references
/// `Some(None)` is sent as `null`, which clears the reference remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WritableIPAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IPAddressStatus>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "role_or_blank")]
    pub role: Option<Option<IPAddressRole>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_object_type: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_object_id: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat_inside: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat_outside: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vrf: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagRef>>,
}

/// Request body for creating or patching a prefix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WritablePrefix {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pool: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PrefixStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vrf: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagRef>>,
}

/// Result of asking a prefix for its next free address
#[derive(Debug, Clone)]
pub enum ClaimOutcome {
    /// NetBox created the address and returned it
    Claimed(IPAddress),
    /// The prefix has no free address left
    NoCapacity,
}

/// Prefix status choices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PrefixStatus {
    Container,
    Active,
    Reserved,
    Deprecated,
}

/// IP Address status choices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum IPAddressStatus {
    Container,
    Active,
    Reserved,
    Deprecated,
    Dhcp,
    Slaac,
}

/// IP Address role choices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum IPAddressRole {
    Loopback,
    Secondary,
    Anycast,
    Vip,
    Vrrp,
    Hsrp,
    Glbp,
    Carp,
}

/// A choice value string that matched none of the known variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChoice {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} value {:?}", self.field, self.value)
    }
}

impl std::error::Error for UnknownChoice {}

macro_rules! choice_enum {
    ($ty:ident, $field:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in NetBox's declaration order
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// The API value for this choice
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($ty::$variant),)+
                    other => Err(UnknownChoice { field: $field, value: other.to_string() }),
                }
            }
        }
    };
}

choice_enum!(PrefixStatus, "prefix status", {
    Container => "container",
    Active => "active",
    Reserved => "reserved",
    Deprecated => "deprecated",
});

choice_enum!(IPAddressStatus, "IP address status", {
    Container => "container",
    Active => "active",
    Reserved => "reserved",
    Deprecated => "deprecated",
    Dhcp => "dhcp",
    Slaac => "slaac",
});

choice_enum!(IPAddressRole, "IP address role", {
    Loopback => "loopback",
    Secondary => "secondary",
    Anycast => "anycast",
    Vip => "vip",
    Vrrp => "vrrp",
    Hsrp => "hsrp",
    Glbp => "glbp",
    Carp => "carp",
});

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Accepts `null`, a single object or a list
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value: Option<OneOrMany<T>> = Option::deserialize(deserializer)?;
    Ok(value.map(Vec::from).unwrap_or_default())
}

/// NetBox renders an unset role as `null` on some versions and as a choice
/// with an empty value on others
fn blank_choice<'de, D>(deserializer: D) -> Result<Option<ChoiceValue<IPAddressRole>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct RawChoice {
        value: Option<String>,
        #[serde(default)]
        label: String,
    }

    let raw: Option<RawChoice> = Option::deserialize(deserializer)?;
    match raw {
        Some(RawChoice { value: Some(value), label }) if !value.is_empty() => value
            .parse()
            .map(|role| Some(ChoiceValue::new(role, label)))
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// The role field is a blank-able char field, so clearing sends `""`
fn role_or_blank<S>(value: &Option<Option<IPAddressRole>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(Some(role)) => role.serialize(serializer),
        _ => serializer.serialize_str(""),
    }
}

/// Creation bodies are posted as a single object; NetBox answers with an
/// object or, on some versions, a one-element list
pub(crate) fn first_created<T>(body: serde_json::Value) -> Result<Option<T>, serde_json::Error>
where
    T: for<'de> Deserialize<'de>,
{
    let items: OneOrMany<T> = serde_json::from_value(body)?;
    Ok(Vec::from(items).into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ip_address_reads_choice_objects() {
        let ip: IPAddress = serde_json::from_value(json!({
            "id": 7,
            "address": "10.0.0.7/24",
            "status": {"value": "active", "label": "Active"},
            "role": {"value": "vip", "label": "VIP"},
            "assigned_object_type": "dcim.interface",
            "assigned_object_id": 12,
            "nat_inside": {"id": 3, "address": "192.168.0.3/24"},
            "nat_outside": [{"id": 4, "address": "203.0.113.4/32"}],
            "tags": [{"id": 1, "name": "pxe", "slug": "pxe"}]
        }))
        .unwrap();

        assert_eq!(ip.status.unwrap().value, IPAddressStatus::Active);
        assert_eq!(ip.role.unwrap().value, IPAddressRole::Vip);
        assert_eq!(ip.nat_outside.len(), 1);
        assert_eq!(ip.nat_outside[0].id, 4);
        assert_eq!(ip.tags[0].name, "pxe");
        assert_eq!(ip.description, "");
    }

    #[test]
    fn test_ip_address_accepts_single_nat_outside_and_blank_role() {
        let ip: IPAddress = serde_json::from_value(json!({
            "id": 8,
            "address": "10.0.0.8/24",
            "role": {"value": "", "label": ""},
            "nat_outside": {"id": 9, "address": "203.0.113.9/32"}
        }))
        .unwrap();

        assert!(ip.role.is_none());
        assert_eq!(ip.nat_outside[0].id, 9);

        let ip: IPAddress = serde_json::from_value(json!({
            "id": 8,
            "address": "10.0.0.8/24",
            "role": null,
            "nat_outside": null
        }))
        .unwrap();
        assert!(ip.role.is_none());
        assert!(ip.nat_outside.is_empty());
    }

    #[test]
    fn test_writable_ip_address_skips_unset_fields() {
        let body = WritableIPAddress {
            description: Some("edge".to_string()),
            nat_inside: Some(None),
            role: Some(None),
            ..WritableIPAddress::default()
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, json!({"description": "edge", "nat_inside": null, "role": ""}));
    }

    #[test]
    fn test_choice_enums_parse_api_values() {
        assert_eq!("dhcp".parse::<IPAddressStatus>().unwrap(), IPAddressStatus::Dhcp);
        assert_eq!("carp".parse::<IPAddressRole>().unwrap(), IPAddressRole::Carp);
        assert!("quarantined".parse::<IPAddressStatus>().is_err());
        assert_eq!(PrefixStatus::Container.to_string(), "container");
        assert_eq!(serde_json::to_value(IPAddressStatus::Dhcp).unwrap(), json!("dhcp"));
    }

    #[test]
    fn test_first_created_handles_object_and_list() {
        let single: Option<NestedTag> =
            first_created(json!({"id": 1, "name": "a"})).unwrap();
        assert_eq!(single.unwrap().id, 1);

        let listed: Option<NestedTag> =
            first_created(json!([{"id": 2, "name": "b"}])).unwrap();
        assert_eq!(listed.unwrap().id, 2);

        let empty: Option<NestedTag> = first_created(json!([])).unwrap();
        assert!(empty.is_none());
    }
}
