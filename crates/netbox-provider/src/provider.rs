//! Provider entry point
//!
//! Owns the NetBox client and hands it to every resource and data source.

use crate::config::ProviderConfig;
use crate::data_sources::{self, DataSources};
use crate::error::ProviderError;
use crate::resources::{self, ip_address::IpAddressResource, ip_by_prefix::PoolAllocator, prefix::PrefixResource};
use netbox_client::NetBoxClientTrait;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Provider {
    client: Arc<dyn NetBoxClientTrait>,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("netbox", &self.client.base_url())
            .finish()
    }
}

impl Provider {
    pub fn new(client: Arc<dyn NetBoxClientTrait>) -> Self {
        Self { client }
    }

    /// Connect to the NetBox described by `config`
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = config.connect()?;
        info!("NetBox client initialized for {}", config.url);
        Ok(Self::new(Arc::new(client)))
    }

    /// Check that NetBox accepts the configured token
    pub async fn check(&self) -> Result<(), ProviderError> {
        self.client.validate_token().await?;
        info!("NetBox token validated against {}", self.client.base_url());
        Ok(())
    }

    pub fn allocator(&self) -> PoolAllocator {
        PoolAllocator::new(self.client.clone())
    }

    pub fn ip_addresses(&self) -> IpAddressResource {
        IpAddressResource::new(self.client.clone())
    }

    pub fn prefixes(&self) -> PrefixResource {
        PrefixResource::new(self.client.clone())
    }

    pub fn data_sources(&self) -> DataSources {
        DataSources::new(self.client.clone())
    }

    pub fn resource_names() -> &'static [&'static str] {
        resources::ALL
    }

    pub fn data_source_names() -> &'static [&'static str] {
        data_sources::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AllocationAttributes, PoolRef};
    use crate::test_utils::*;
    use netbox_client::MockCall;

    #[tokio::test]
    async fn test_components_share_one_client() {
        let mock = create_test_client_with_pools(&[(1, "10.1.0.0/24", &["10.1.0.1/24"])]);
        let provider = Provider::new(as_client(&mock));

        provider.check().await.unwrap();
        let allocation = provider
            .allocator()
            .claim(&[PoolRef::new(1)], &AllocationAttributes::default())
            .await
            .unwrap();
        assert!(provider.ip_addresses().exists(allocation.id).await.unwrap());
        assert!(provider.prefixes().exists(1).await.unwrap());

        assert_eq!(mock.calls()[0], MockCall::ValidateToken);
        assert_eq!(mock.claim_attempts(), vec![1]);
    }

    #[test]
    fn test_registered_names() {
        assert_eq!(
            Provider::resource_names(),
            &["netbox_ipam_ip_by_prefix", "netbox_ipam_ip_addresses", "netbox_ipam_prefix"]
        );
        assert!(Provider::data_source_names().contains(&"netbox_ipam_prefixes"));
        assert_eq!(Provider::data_source_names().len(), 5);
    }

    #[test]
    fn test_from_config_builds_http_client() {
        let config = ProviderConfig::from_lookup(|key| {
            (key == crate::config::NETBOX_TOKEN).then(|| "abc".to_string())
        })
        .unwrap();
        let provider = Provider::from_config(&config).unwrap();
        assert!(format!("{provider:?}").contains("netbox.netbox"));
    }
}
