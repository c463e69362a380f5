//! Unit tests for the pooled IP allocator

#[cfg(test)]
mod tests {
    use crate::attributes::{AllocationAttributes, AttributeChange, PoolRef};
    use crate::error::ProviderError;
    use crate::resources::ip_by_prefix::PoolAllocator;
    use crate::test_utils::*;
    use netbox_client::{IPAddressRole, IPAddressStatus, MockCall, NetBoxError};
    use serde_json::json;
    use std::collections::BTreeSet;

    fn pools(ids: &[u64]) -> Vec<PoolRef> {
        ids.iter().copied().map(PoolRef::new).collect()
    }

    #[tokio::test]
    async fn test_claim_from_first_pool_with_capacity() {
        let mock = create_test_client_with_pools(&[
            (1, "10.1.0.0/24", &["10.1.0.1/24"]),
            (2, "10.2.0.0/24", &["10.2.0.1/24"]),
        ]);
        let allocator = PoolAllocator::new(as_client(&mock));

        let allocation = allocator
            .claim(&pools(&[1, 2]), &AllocationAttributes::default())
            .await
            .unwrap();

        assert_eq!(allocation.address, "10.1.0.1/24");
        // The second pool is never asked
        assert_eq!(mock.claim_attempts(), vec![1]);
    }

    #[tokio::test]
    async fn test_claim_skips_full_pool() {
        let mock = create_test_client_with_pools(&[
            (1, "10.1.0.0/30", &[]),
            (2, "10.2.0.0/24", &["10.2.0.7/24"]),
        ]);
        let allocator = PoolAllocator::new(as_client(&mock));

        let attributes = AllocationAttributes {
            description: Some("pxe".to_string()),
            ..AllocationAttributes::default()
        };
        let allocation = allocator.claim(&pools(&[1, 2]), &attributes).await.unwrap();

        assert_eq!(allocation.address, "10.2.0.7/24");
        assert_eq!(allocation.attributes.description.as_deref(), Some("pxe"));
        assert_eq!(mock.claim_attempts(), vec![1, 2]);
        assert!(mock.ip_address(allocation.id).is_some());
    }

    #[tokio::test]
    async fn test_claim_honours_caller_order() {
        let mock = create_test_client_with_pools(&[
            (1, "10.1.0.0/24", &["10.1.0.1/24"]),
            (2, "10.2.0.0/24", &["10.2.0.1/24"]),
        ]);
        let allocator = PoolAllocator::new(as_client(&mock));

        let allocation = allocator
            .claim(&pools(&[2, 1]), &AllocationAttributes::default())
            .await
            .unwrap();

        assert_eq!(allocation.address, "10.2.0.1/24");
        assert_eq!(mock.claim_attempts(), vec![2]);
    }

    #[tokio::test]
    async fn test_all_pools_exhausted() {
        let mock = create_test_client_with_pools(&[
            (1, "10.1.0.0/30", &[]),
            (2, "10.2.0.0/30", &[]),
        ]);
        let allocator = PoolAllocator::new(as_client(&mock));

        let err = allocator
            .claim(&pools(&[1, 2]), &AllocationAttributes::default())
            .await
            .unwrap_err();

        match err {
            ProviderError::PoolsExhausted { attempted } => assert_eq!(attempted, vec![1, 2]),
            other => panic!("expected PoolsExhausted, got {other:?}"),
        }
        // Each pool is asked exactly once
        assert_eq!(mock.claim_attempts(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_single_full_pool_is_exhausted() {
        let mock = create_test_client_with_pools(&[(1, "10.1.0.0/30", &[])]);
        let allocator = PoolAllocator::new(as_client(&mock));

        let err = allocator
            .claim(&pools(&[1]), &AllocationAttributes::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::PoolsExhausted { ref attempted } if attempted == &[1]));
    }

    #[tokio::test]
    async fn test_claim_without_pools_makes_no_calls() {
        let mock = create_test_client();
        let allocator = PoolAllocator::new(as_client(&mock));

        let err = allocator.claim(&[], &AllocationAttributes::default()).await.unwrap_err();

        assert!(matches!(err, ProviderError::InvalidArgument(_)));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_attributes_are_rejected_before_claiming() {
        let mock = create_test_client_with_pools(&[(1, "10.1.0.0/24", &["10.1.0.1/24"])]);
        let allocator = PoolAllocator::new(as_client(&mock));

        let attributes = AllocationAttributes {
            description: Some(String::new()),
            ..AllocationAttributes::default()
        };
        let err = allocator.claim(&pools(&[1]), &attributes).await.unwrap_err();

        assert!(matches!(err, ProviderError::Validation(_)));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_remote_failure_stops_the_search() {
        let mock = create_test_client_with_pools(&[
            (1, "10.1.0.0/24", &["10.1.0.1/24"]),
            (2, "10.2.0.0/24", &["10.2.0.1/24"]),
        ]);
        mock.fail_prefix(1, "500 Internal Server Error");
        let allocator = PoolAllocator::new(as_client(&mock));

        let err = allocator
            .claim(&pools(&[1, 2]), &AllocationAttributes::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Remote(NetBoxError::Api(_))));
        assert_eq!(mock.claim_attempts(), vec![1]);
        assert!(mock.ip_address(1).is_none());
    }

    #[tokio::test]
    async fn test_claim_sends_attributes_and_reads_back() {
        let mock = create_test_client_with_pools(&[(1, "10.1.0.0/24", &["10.1.0.9/24"])]);
        let allocator = PoolAllocator::new(as_client(&mock));

        let attributes = AllocationAttributes {
            dns_name: Some("pxe.example.com".to_string()),
            interface_id: Some(12),
            role: Some(IPAddressRole::Anycast),
            status: IPAddressStatus::Reserved,
            tags: BTreeSet::from(["pxe".to_string()]),
            tenant_id: Some(5),
            ..AllocationAttributes::default()
        };
        let allocation = allocator.claim(&pools(&[1]), &attributes).await.unwrap();

        assert_eq!(allocation.attributes, attributes);

        let calls = mock.calls();
        let MockCall::ClaimAvailableIp { prefix_id, body } = &calls[0] else {
            panic!("first call should be a claim, got {:?}", calls[0]);
        };
        assert_eq!(*prefix_id, 1);
        assert_eq!(body["assigned_object_type"], json!("dcim.interface"));
        assert_eq!(body["role"], json!("anycast"));
        assert_eq!(body["status"], json!("reserved"));
        assert!(body.get("address").is_none());
        assert_eq!(calls[1], MockCall::GetIpAddress { id: allocation.id });
    }

    #[tokio::test]
    async fn test_refresh_clears_id_of_deleted_address() {
        let mock = create_test_client_with_pools(&[(1, "10.1.0.0/24", &["10.1.0.1/24"])]);
        let allocator = PoolAllocator::new(as_client(&mock));
        let allocation = allocator
            .claim(&pools(&[1]), &AllocationAttributes::default())
            .await
            .unwrap();

        let mut id = Some(allocation.id);
        let refreshed = allocator.refresh(&mut id).await.unwrap();
        assert_eq!(refreshed, Some(allocation.clone()));
        assert_eq!(id, Some(allocation.id));

        mock.remove_ip_address(allocation.id);
        let refreshed = allocator.refresh(&mut id).await.unwrap();
        assert!(refreshed.is_none());
        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn test_update_sends_only_marked_attributes() {
        let mock = create_test_client();
        let mut ip = mock.helpers().ip_address(7, "10.0.0.7/24");
        ip.description = "old".to_string();
        ip.dns_name = "old.example.com".to_string();
        ip.nat_inside = Some(mock.helpers().create_nested_ip(3));
        mock.add_ip_address(ip);
        let allocator = PoolAllocator::new(as_client(&mock));

        let allocation = allocator
            .update(7, &[AttributeChange::Description(None), AttributeChange::NatInside(None)])
            .await
            .unwrap();

        assert_eq!(allocation.attributes.description, None);
        assert_eq!(allocation.attributes.nat_inside_id, None);
        assert_eq!(allocation.attributes.dns_name.as_deref(), Some("old.example.com"));

        let update = mock
            .calls()
            .into_iter()
            .find_map(|call| match call {
                MockCall::UpdateIpAddress { id, body } => Some((id, body)),
                _ => None,
            })
            .unwrap();
        assert_eq!(update, (7, json!({"description": "", "nat_inside": null})));
    }

    #[tokio::test]
    async fn test_update_without_changes_only_reads() {
        let mock = create_test_client();
        mock.add_ip_address(mock.helpers().ip_address(7, "10.0.0.7/24"));
        let allocator = PoolAllocator::new(as_client(&mock));

        let allocation = allocator.update(7, &[]).await.unwrap();

        assert_eq!(allocation.address, "10.0.0.7/24");
        assert_eq!(mock.calls(), vec![MockCall::GetIpAddress { id: 7 }]);
    }

    #[tokio::test]
    async fn test_update_of_missing_address_fails() {
        let mock = create_test_client();
        let allocator = PoolAllocator::new(as_client(&mock));

        let err = allocator
            .update(7, &[AttributeChange::Status(IPAddressStatus::Deprecated)])
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Remote(NetBoxError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_release_deletes_existing_address() {
        let mock = create_test_client_with_pools(&[(1, "10.1.0.0/24", &["10.1.0.1/24"])]);
        let allocator = PoolAllocator::new(as_client(&mock));
        let allocation = allocator
            .claim(&pools(&[1]), &AllocationAttributes::default())
            .await
            .unwrap();

        allocator.release(allocation.id).await.unwrap();

        assert!(mock.ip_address(allocation.id).is_none());
        assert!(mock.calls().contains(&MockCall::DeleteIpAddress { id: allocation.id }));
    }

    #[tokio::test]
    async fn test_release_of_absent_address_is_a_no_op() {
        let mock = create_test_client();
        let allocator = PoolAllocator::new(as_client(&mock));

        allocator.release(99).await.unwrap();

        assert!(!mock
            .calls()
            .iter()
            .any(|call| matches!(call, MockCall::DeleteIpAddress { .. })));
    }

    #[tokio::test]
    async fn test_failed_read_back_still_returns_claimed_id() {
        let mock = create_test_client_with_pools(&[(1, "10.1.0.0/24", &["10.1.0.1/24"])]);
        mock.fail_reads("502 Bad Gateway");
        let allocator = PoolAllocator::new(as_client(&mock));

        let allocation = allocator
            .claim(&pools(&[1]), &AllocationAttributes::default())
            .await
            .unwrap();

        assert_eq!(allocation.address, "10.1.0.1/24");
        assert!(mock.ip_address(allocation.id).is_some());
        assert_eq!(mock.calls()[1], MockCall::GetIpAddress { id: allocation.id });
    }

    #[tokio::test]
    async fn test_release_tolerates_concurrent_delete() {
        let mock = create_test_client_with_pools(&[(1, "10.1.0.0/24", &["10.1.0.1/24"])]);
        let allocator = PoolAllocator::new(as_client(&mock));
        let allocation = allocator
            .claim(&pools(&[1]), &AllocationAttributes::default())
            .await
            .unwrap();

        mock.race_deletes();
        allocator.release(allocation.id).await.unwrap();

        assert!(mock.ip_address(allocation.id).is_none());
        assert!(mock.calls().contains(&MockCall::DeleteIpAddress { id: allocation.id }));
    }
}
