use super::{DataSources, SITE};
use crate::error::ProviderError;
use crate::helpers::expect_single;
use crate::validation::validate_slug;
use netbox_client::{Site, SlugFilter};

impl DataSources {
    /// The site with the given slug
    pub async fn site(&self, slug: &str) -> Result<Site, ProviderError> {
        validate_slug("slug", slug)?;
        let page = self.client.list_sites(&SlugFilter::new(slug)).await?;
        expect_single(SITE, page)
    }
}
