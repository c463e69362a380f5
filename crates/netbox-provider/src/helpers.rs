//! Helper functions shared by resources and data sources

use crate::error::ProviderError;
use netbox_client::PaginatedResponse;
use tracing::debug;

/// Trait for NetBox objects that have an ID and URL
pub trait NetBoxObject {
    fn id(&self) -> u64;
    fn url(&self) -> &str;
}

macro_rules! netbox_object {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl NetBoxObject for $ty {
                fn id(&self) -> u64 { self.id }
                fn url(&self) -> &str { &self.url }
            }
        )+
    };
}

netbox_object!(
    netbox_client::IPAddress,
    netbox_client::Prefix,
    netbox_client::Site,
    netbox_client::Role,
    netbox_client::Vlan,
);

/// Whether a filtered listing really contains `id`.
///
/// The `count` of a filtered listing is not trusted on its own; only an
/// exact match in `results` counts.
pub fn contains_id<T: NetBoxObject>(page: &PaginatedResponse<T>, id: u64) -> bool {
    page.results.iter().any(|object| object.id() == id)
}

/// Take the object with `id` out of a filtered listing
pub fn take_by_id<T: NetBoxObject>(page: PaginatedResponse<T>, id: u64) -> Option<T> {
    page.results.into_iter().find(|object| object.id() == id)
}

/// The single match of a lookup; any other count is an error
pub fn expect_single<T: NetBoxObject>(
    data_source: &'static str,
    page: PaginatedResponse<T>,
) -> Result<T, ProviderError> {
    if page.count != 1 {
        return Err(ProviderError::AmbiguousLookup { data_source, count: page.count });
    }

    let object = page
        .results
        .into_iter()
        .next()
        .ok_or(ProviderError::AmbiguousLookup { data_source, count: 0 })?;
    debug!("{} matched NetBox object {} ({})", data_source, object.id(), object.url());
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use netbox_client::MockNetBoxClient;

    #[test]
    fn test_contains_id_needs_exact_match() {
        let helpers = MockNetBoxClient::new("http://test-netbox").helpers();
        let mut page = PaginatedResponse::single_page(vec![helpers.ip_address(7, "10.0.0.7/24")]);

        assert!(contains_id(&page, 7));
        assert!(!contains_id(&page, 8));

        // A count without a matching result is not enough
        page.results.clear();
        assert!(!contains_id(&page, 7));
        assert!(take_by_id(page, 7).is_none());
    }

    #[test]
    fn test_expect_single() {
        let helpers = MockNetBoxClient::new("http://test-netbox").helpers();

        let page = PaginatedResponse::single_page(vec![helpers.site(1, "dc-1")]);
        assert_eq!(expect_single("netbox_dcim_site", page).unwrap().id, 1);

        let empty: PaginatedResponse<netbox_client::Site> = PaginatedResponse::single_page(Vec::new());
        let err = expect_single("netbox_dcim_site", empty).unwrap_err();
        assert!(matches!(err, ProviderError::AmbiguousLookup { count: 0, .. }));

        let page = PaginatedResponse::single_page(vec![helpers.site(1, "dc-1"), helpers.site(2, "dc-1")]);
        let err = expect_single("netbox_dcim_site", page).unwrap_err();
        assert!(matches!(err, ProviderError::AmbiguousLookup { data_source: "netbox_dcim_site", count: 2 }));
    }
}
