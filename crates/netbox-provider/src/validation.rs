//! Attribute validation.
//!
//! Local checks run before any remote call. A value that fails here is
//! reported immediately and never retried.

use ipnetwork::IpNetwork;
use netbox_client::{IPAddressRole, IPAddressStatus, PrefixStatus};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}/[0-9]{1,2}$")
        .unwrap_or_else(|e| panic!("address pattern: {e}"))
});

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-a-zA-Z0-9_]{1,50}$").unwrap_or_else(|e| panic!("slug pattern: {e}"))
});

static DNS_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-a-zA-Z0-9_.]{1,255}$").unwrap_or_else(|e| panic!("dns name pattern: {e}"))
});

pub const DESCRIPTION_MAX_LEN: usize = 100;

/// Statuses an IP address may be configured with
pub const IP_STATUSES: &[IPAddressStatus] = &[
    IPAddressStatus::Container,
    IPAddressStatus::Active,
    IPAddressStatus::Reserved,
    IPAddressStatus::Deprecated,
    IPAddressStatus::Dhcp,
];

/// A single attribute that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message} (got {value:?})")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, value: &str, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.to_string(),
            message: message.into(),
        }
    }
}

/// Dotted-quad address with prefix length, e.g. `192.168.56.1/24`
pub fn validate_address(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if ADDRESS_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(field, value, "Must be like 192.168.56.1/24"))
    }
}

pub fn validate_slug(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if SLUG_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(field, value, "Must be like ^[-a-zA-Z0-9_]{1,50}$"))
    }
}

pub fn validate_dns_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if DNS_NAME_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(field, value, "Must be like ^[-a-zA-Z0-9_.]{1,255}$"))
    }
}

/// Between 1 and 100 characters
pub fn validate_description(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if (1..=DESCRIPTION_MAX_LEN).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            value,
            format!("expected length between 1 and {}", DESCRIPTION_MAX_LEN),
        ))
    }
}

/// A CIDR network address: host bits must be zero
pub fn validate_cidr_network(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let network: IpNetwork = value
        .parse()
        .map_err(|e| ValidationError::new(field, value, format!("not a valid CIDR: {e}")))?;

    if network.ip() == network.network() {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            value,
            format!("expected network address {}/{}", network.network(), network.prefix()),
        ))
    }
}

/// Parse an IP address status restricted to the configurable set
pub fn parse_ip_status(field: &'static str, value: &str) -> Result<IPAddressStatus, ValidationError> {
    value
        .parse::<IPAddressStatus>()
        .ok()
        .filter(|status| IP_STATUSES.contains(status))
        .ok_or_else(|| ValidationError::new(field, value, expected_one_of(IP_STATUSES)))
}

pub fn parse_ip_role(field: &'static str, value: &str) -> Result<IPAddressRole, ValidationError> {
    value
        .parse::<IPAddressRole>()
        .map_err(|_| ValidationError::new(field, value, expected_one_of(IPAddressRole::ALL)))
}

pub fn parse_prefix_status(field: &'static str, value: &str) -> Result<PrefixStatus, ValidationError> {
    value
        .parse::<PrefixStatus>()
        .map_err(|_| ValidationError::new(field, value, expected_one_of(PrefixStatus::ALL)))
}

fn expected_one_of<T: std::fmt::Display>(choices: &[T]) -> String {
    let names: Vec<String> = choices.iter().map(ToString::to_string).collect();
    format!("expected one of [{}]", names.join(", "))
}
