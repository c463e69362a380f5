use super::DataSources;
use crate::attributes::PoolRef;
use crate::error::ProviderError;
use chrono::Utc;
use netbox_client::PrefixFilter;
use serde::Serialize;
use tracing::debug;

/// Prefixes matching a tag set, in NetBox's listing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixIds {
    /// Changes on every lookup so the result is never considered cached
    pub id: String,
    pub ids: Vec<u64>,
}

impl PrefixIds {
    /// The matching prefixes as an ordered pool list
    pub fn pools(&self) -> Vec<PoolRef> {
        self.ids.iter().copied().map(PoolRef::new).collect()
    }
}

impl DataSources {
    /// Every prefix carrying all of `tags`; any number of matches is fine
    pub async fn prefixes<I, S>(&self, tags: I) -> Result<PrefixIds, ProviderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filter = PrefixFilter::with_tags(tags);
        let prefixes = self.client.query_prefixes(&filter).await?;
        debug!("{} prefixes match tags {:?}", prefixes.len(), filter.tags);

        Ok(PrefixIds {
            id: Utc::now().timestamp().to_string(),
            ids: prefixes.iter().map(|prefix| prefix.id).collect(),
        })
    }
}
