//! NetBox IPAM provider
//!
//! Resources and data sources over the NetBox API, built on `netbox-client`.
//! The central piece is the pooled allocator: given an ordered list of
//! prefixes, it claims the next free IP address from the first one that
//! still has room.
//!
//! # Example
//!
//! ```no_run
//! use netbox_provider::{AllocationAttributes, Provider, ProviderConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Provider::from_config(&ProviderConfig::from_env()?)?;
//!
//! // Every prefix tagged "pxe", in NetBox order
//! let pools = provider.data_sources().prefixes(["pxe"]).await?.pools();
//!
//! let attributes = AllocationAttributes {
//!     description: Some("PXE boot server".to_string()),
//!     ..AllocationAttributes::default()
//! };
//! let allocation = provider.allocator().claim(&pools, &attributes).await?;
//! println!("claimed {} (ID: {})", allocation.address, allocation.id);
//! # Ok(())
//! # }
//! ```

pub mod attributes;
pub mod config;
pub mod data_sources;
pub mod error;
pub mod helpers;
pub mod provider;
pub mod resources;
pub mod validation;
#[cfg(test)]
mod test_utils;

pub use attributes::{Allocation, AllocationAttributes, AttributeChange, PoolRef};
pub use config::ProviderConfig;
pub use data_sources::{DataSources, PrefixIds};
pub use error::ProviderError;
pub use provider::Provider;
pub use resources::ip_address::{IpAddressChange, IpAddressConfig, IpAddressResource};
pub use resources::ip_by_prefix::PoolAllocator;
pub use resources::prefix::{PrefixChange, PrefixConfig, PrefixRecord, PrefixResource};
pub use validation::ValidationError;
