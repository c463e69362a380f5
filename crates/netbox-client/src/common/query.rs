//! Query filters for NetBox list endpoints
//!
//! Each filter is an immutable record of optional criteria, built once and
//! rendered to query pairs when the request is made.

/// A set of list-endpoint criteria
pub trait QueryFilter: Send + Sync {
    /// Query parameters in request order; a key may repeat
    fn query_pairs(&self) -> Vec<(&'static str, String)>;

    /// URL-encoded query string, empty when no criteria are set
    fn query_string(&self) -> String {
        self.query_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Criteria for `/api/ipam/ip-addresses/`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpAddressFilter {
    pub id: Option<u64>,
    pub address: Option<String>,
}

impl IpAddressFilter {
    pub fn by_id(id: u64) -> Self {
        Self { id: Some(id), ..Self::default() }
    }

    pub fn by_address(address: impl Into<String>) -> Self {
        Self { address: Some(address.into()), ..Self::default() }
    }
}

impl QueryFilter for IpAddressFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.id {
            pairs.push(("id", id.to_string()));
        }
        if let Some(address) = &self.address {
            pairs.push(("address", address.clone()));
        }
        pairs
    }
}

/// Criteria for `/api/ipam/prefixes/`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixFilter {
    pub id: Option<u64>,
    /// Tag slugs; NetBox requires every listed tag to match
    pub tags: Vec<String>,
}

impl PrefixFilter {
    pub fn by_id(id: u64) -> Self {
        Self { id: Some(id), ..Self::default() }
    }

    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: None,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

impl QueryFilter for PrefixFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.id {
            pairs.push(("id", id.to_string()));
        }
        pairs.extend(self.tags.iter().map(|tag| ("tag", tag.clone())));
        pairs
    }
}

/// Lookup by slug, shared by sites and roles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlugFilter {
    pub slug: Option<String>,
}

impl SlugFilter {
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: Some(slug.into()) }
    }
}

impl QueryFilter for SlugFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.slug.iter().map(|slug| ("slug", slug.clone())).collect()
    }
}

/// Criteria for `/api/ipam/vlans/`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VlanFilter {
    pub vid: Option<u16>,
    pub group_id: Option<u64>,
}

impl QueryFilter for VlanFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(vid) = self.vid {
            pairs.push(("vid", vid.to_string()));
        }
        if let Some(group_id) = self.group_id {
            pairs.push(("group_id", group_id.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_render_nothing() {
        assert_eq!(IpAddressFilter::default().query_string(), "");
        assert_eq!(PrefixFilter::default().query_string(), "");
        assert_eq!(SlugFilter::default().query_string(), "");
        assert_eq!(VlanFilter::default().query_string(), "");
    }

    #[test]
    fn test_address_is_url_encoded() {
        let filter = IpAddressFilter::by_address("192.168.56.1/24");
        assert_eq!(filter.query_string(), "address=192.168.56.1%2F24");
    }

    #[test]
    fn test_prefix_tags_repeat_the_key() {
        let filter = PrefixFilter::with_tags(["pxe", "rack 1"]);
        assert_eq!(filter.query_string(), "tag=pxe&tag=rack%201");
    }

    #[test]
    fn test_vlan_group_is_optional() {
        let filter = VlanFilter { vid: Some(100), group_id: None };
        assert_eq!(filter.query_string(), "vid=100");

        let filter = VlanFilter { vid: Some(100), group_id: Some(4) };
        assert_eq!(filter.query_string(), "vid=100&group_id=4");
    }
}
