use super::{DataSources, VLAN};
use crate::error::ProviderError;
use crate::helpers::expect_single;
use netbox_client::{Vlan, VlanFilter};

impl DataSources {
    /// The VLAN with the given VID. Without a group the VID must be unique
    /// across NetBox.
    pub async fn vlan(&self, vid: u16, group_id: Option<u64>) -> Result<Vlan, ProviderError> {
        let filter = VlanFilter { vid: Some(vid), group_id };
        let page = self.client.list_vlans(&filter).await?;
        expect_single(VLAN, page)
    }
}
