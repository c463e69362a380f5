//! Test utilities for unit testing resources and data sources
//!
//! This module provides helpers for creating test data and setting up test scenarios.

#[cfg(test)]
use netbox_client::{MockNetBoxClient, NetBoxClientTrait};
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
pub const TEST_NETBOX_URL: &str = "http://test-netbox";

/// Helper to create an empty mock NetBox
#[cfg(test)]
pub fn create_test_client() -> MockNetBoxClient {
    MockNetBoxClient::new(TEST_NETBOX_URL)
}

/// Helper to create a mock NetBox holding the given prefixes.
///
/// Each entry is `(prefix id, CIDR, free addresses in hand-out order)`.
#[cfg(test)]
pub fn create_test_client_with_pools(pools: &[(u64, &str, &[&str])]) -> MockNetBoxClient {
    let mock = create_test_client();
    let helpers = mock.helpers();
    for (id, cidr, free) in pools {
        mock.add_prefix(helpers.prefix(*id, cidr), free);
    }
    mock
}

/// Share a mock as the injected client
#[cfg(test)]
pub fn as_client(mock: &MockNetBoxClient) -> Arc<dyn NetBoxClientTrait> {
    Arc::new(mock.clone())
}
