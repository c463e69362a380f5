//! NetBox REST API Client
//!
//! A Rust client library for the parts of the NetBox REST API used to
//! allocate and manage IP addresses: prefixes, IP addresses, sites, roles
//! and VLANs.
//!
//! # Example
//!
//! ```no_run
//! use netbox_client::{ClaimOutcome, NetBoxClient, PrefixFilter, WritableIPAddress};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = NetBoxClient::new(
//!     "http://netbox:80".to_string(),
//!     "your-api-token".to_string(),
//! )?;
//!
//! // Find candidate prefixes by tag
//! let prefixes = client.query_prefixes(&PrefixFilter::with_tags(["pxe"])).await?;
//!
//! // Claim the next free address from the first one
//! if let Some(prefix) = prefixes.first() {
//!     let body = WritableIPAddress {
//!         description: Some("PXE boot server".to_string()),
//!         ..WritableIPAddress::default()
//!     };
//!     match client.claim_available_ip(prefix.id, &body).await? {
//!         ClaimOutcome::Claimed(ip) => println!("claimed {}", ip.address),
//!         ClaimOutcome::NoCapacity => println!("prefix {} is full", prefix.id),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **IPAM Operations**: claim, read, update and delete IP addresses; manage prefixes
//! - **Lookups**: sites, roles and VLANs through immutable filter records
//! - **Typed outcomes**: exhausted prefixes and missing objects are reported
//!   as values, not as error text
//! - **Pagination**: Support for fetching all pages of large result sets
//! - **Mocking**: an in-memory client behind the `test-util` feature

pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod netbox_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::NetBoxClient;
pub use common::query::{IpAddressFilter, PrefixFilter, QueryFilter, SlugFilter, VlanFilter};
pub use common::{HttpClient, PaginatedResponse};
pub use error::NetBoxError;
pub use models::*;
pub use netbox_trait::NetBoxClientTrait;
#[cfg(feature = "test-util")]
pub use mock::{MockCall, MockNetBoxClient};
