use super::{DataSources, ROLE};
use crate::error::ProviderError;
use crate::helpers::expect_single;
use crate::validation::validate_slug;
use netbox_client::{Role, SlugFilter};

impl DataSources {
    /// The prefix/VLAN role with the given slug
    pub async fn role(&self, slug: &str) -> Result<Role, ProviderError> {
        validate_slug("slug", slug)?;
        let page = self.client.list_roles(&SlugFilter::new(slug)).await?;
        expect_single(ROLE, page)
    }
}
