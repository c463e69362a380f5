//! Unit tests for the prefix resource

#[cfg(test)]
mod tests {
    use crate::error::ProviderError;
    use crate::resources::prefix::{PrefixChange, PrefixConfig, PrefixResource};
    use crate::test_utils::*;
    use netbox_client::{MockCall, PrefixStatus};
    use serde_json::json;
    use std::collections::BTreeSet;

    #[tokio::test]
    async fn test_create_prefix() {
        let mock = create_test_client();
        let resource = PrefixResource::new(as_client(&mock));

        let mut config = PrefixConfig::new("10.20.0.0/24");
        config.is_pool = true;
        config.site_id = Some(4);
        config.tags = BTreeSet::from(["pxe".to_string()]);

        let record = resource.create(&config).await.unwrap();

        assert_eq!(record.config, config);
        assert_eq!(
            mock.calls()[0],
            MockCall::CreatePrefix {
                body: json!({
                    "prefix": "10.20.0.0/24",
                    "is_pool": true,
                    "status": "active",
                    "site": 4,
                    "tags": [{"name": "pxe"}]
                })
            }
        );
    }

    #[tokio::test]
    async fn test_create_rejects_host_address() {
        let mock = create_test_client();
        let resource = PrefixResource::new(as_client(&mock));

        let err = resource.create(&PrefixConfig::new("10.20.0.1/24")).await.unwrap_err();

        assert!(matches!(err, ProviderError::Validation(ref e) if e.field == "prefix"));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_clears_site_and_description() {
        let mock = create_test_client_with_pools(&[(8, "10.8.0.0/24", &[])]);
        let resource = PrefixResource::new(as_client(&mock));

        let mut id = Some(8);
        let old = resource.read(&mut id).await.unwrap().unwrap().config;
        let mut desired = old.clone();
        desired.description = Some("lab".to_string());
        desired.site_id = Some(2);
        let record = resource.update(8, &PrefixChange::diff(&old, &desired)).await.unwrap();
        assert_eq!(record.config, desired);

        mock.clear_calls();
        let record = resource
            .update(8, &[PrefixChange::Description(None), PrefixChange::Site(None), PrefixChange::Status(PrefixStatus::Deprecated)])
            .await
            .unwrap();

        assert_eq!(record.config.description, None);
        assert_eq!(record.config.site_id, None);
        assert_eq!(record.config.status, PrefixStatus::Deprecated);
        assert_eq!(
            mock.calls()[0],
            MockCall::UpdatePrefix {
                id: 8,
                body: json!({"description": "", "site": null, "status": "deprecated"}),
            }
        );
    }

    #[tokio::test]
    async fn test_read_and_delete_of_missing_prefix() {
        let mock = create_test_client();
        let resource = PrefixResource::new(as_client(&mock));

        let mut id = Some(8);
        assert!(resource.read(&mut id).await.unwrap().is_none());
        assert_eq!(id, None);

        resource.delete(8).await.unwrap();
        assert!(!mock.calls().contains(&MockCall::DeletePrefix { id: 8 }));
    }

    #[tokio::test]
    async fn test_delete_existing_prefix() {
        let mock = create_test_client_with_pools(&[(8, "10.8.0.0/24", &[])]);
        let resource = PrefixResource::new(as_client(&mock));

        assert!(resource.exists(8).await.unwrap());
        resource.delete(8).await.unwrap();
        assert!(mock.prefix(8).is_none());
    }

    #[tokio::test]
    async fn test_create_survives_failed_read_back() {
        let mock = create_test_client();
        mock.fail_reads("502 Bad Gateway");
        let resource = PrefixResource::new(as_client(&mock));

        let record = resource.create(&PrefixConfig::new("10.30.0.0/24")).await.unwrap();

        assert_eq!(record.config.prefix, "10.30.0.0/24");
        assert!(mock.prefix(record.id).is_some());
    }

    #[tokio::test]
    async fn test_delete_tolerates_concurrent_delete() {
        let mock = create_test_client_with_pools(&[(8, "10.8.0.0/24", &[])]);
        mock.race_deletes();
        let resource = PrefixResource::new(as_client(&mock));

        resource.delete(8).await.unwrap();
        assert!(mock.calls().contains(&MockCall::DeletePrefix { id: 8 }));
        assert!(mock.prefix(8).is_none());
    }
}
