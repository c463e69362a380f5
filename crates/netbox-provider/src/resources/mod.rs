//! Managed NetBox objects
//!
//! Handles: pooled IP allocation, IP addresses, prefixes

pub mod ip_address;
pub mod ip_by_prefix;
#[cfg(test)]
mod ip_by_prefix_test;
pub mod prefix;
#[cfg(test)]
mod prefix_test;

/// Every resource type name
pub const ALL: &[&str] = &[
    ip_by_prefix::RESOURCE_NAME,
    ip_address::RESOURCE_NAME,
    prefix::RESOURCE_NAME,
];
