use super::{DataSources, IP_ADDRESSES};
use crate::attributes::Allocation;
use crate::error::ProviderError;
use crate::helpers::expect_single;
use crate::validation::validate_address;
use netbox_client::IpAddressFilter;

impl DataSources {
    /// The IP address with the given address, e.g. `192.168.56.1/24`
    pub async fn ip_address(&self, address: &str) -> Result<Allocation, ProviderError> {
        validate_address("address", address)?;
        let page = self.client.list_ip_addresses(&IpAddressFilter::by_address(address)).await?;
        let ip = expect_single(IP_ADDRESSES, page)?;
        Ok(Allocation::from_remote(&ip))
    }
}
