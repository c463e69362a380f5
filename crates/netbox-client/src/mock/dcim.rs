//! DCIM operations for MockNetBoxClient

use super::{MockCall, MockNetBoxClient, lock};
use crate::common::PaginatedResponse;
use crate::common::query::SlugFilter;
use crate::error::NetBoxError;
use crate::models::Site;

pub async fn list_sites(client: &MockNetBoxClient, filter: &SlugFilter) -> Result<PaginatedResponse<Site>, NetBoxError> {
    client.record(MockCall::ListSites { filter: filter.clone() });

    let results = lock(&client.sites)
        .iter()
        .filter(|site| filter.slug.as_ref().is_none_or(|slug| &site.slug == slug))
        .cloned()
        .collect();
    Ok(PaginatedResponse::single_page(results))
}
