//! Integration tests for NetBox client
//!
//! These tests require a running NetBox instance.
//! Set NETBOX_URL and NETBOX_TOKEN environment variables to run.

use netbox_client::{
    ClaimOutcome, IPAddressStatus, IpAddressFilter, NetBoxClient, PrefixFilter, SlugFilter,
    WritableIPAddress,
};

fn live_client() -> NetBoxClient {
    let url = std::env::var("NETBOX_URL")
        .unwrap_or_else(|_| "http://localhost:8001".to_string());
    let token = std::env::var("NETBOX_TOKEN")
        .expect("NETBOX_TOKEN environment variable must be set");

    NetBoxClient::new(url, token).expect("Failed to create client")
}

#[tokio::test]
#[ignore] // Requires running NetBox instance
async fn test_validate_token() {
    let client = live_client();
    client.validate_token().await.expect("token should be accepted");
}

#[tokio::test]
#[ignore]
async fn test_query_prefixes() {
    let client = live_client();

    let prefixes = client.query_prefixes(&PrefixFilter::default()).await
        .expect("Failed to query prefixes");

    println!("Found {} prefixes", prefixes.len());
}

#[tokio::test]
#[ignore]
async fn test_list_sites() {
    let client = live_client();

    let sites = client.list_sites(&SlugFilter::default()).await
        .expect("Failed to list sites");

    println!("Found {} sites", sites.count);
}

#[tokio::test]
#[ignore]
async fn test_claim_and_delete_ip() {
    let client = live_client();

    let prefixes = client.query_prefixes(&PrefixFilter::default()).await
        .expect("Failed to query prefixes");
    let Some(prefix) = prefixes.first() else {
        println!("No prefixes to claim from");
        return;
    };

    let body = WritableIPAddress {
        description: Some("Test IP address".to_string()),
        status: Some(IPAddressStatus::Reserved),
        ..WritableIPAddress::default()
    };

    match client.claim_available_ip(prefix.id, &body).await.expect("claim failed") {
        ClaimOutcome::Claimed(ip) => {
            println!("Claimed IP address: {}", ip.address);

            let listed = client.list_ip_addresses(&IpAddressFilter::by_id(ip.id)).await
                .expect("Failed to list IP addresses");
            assert!(listed.results.iter().any(|found| found.id == ip.id));

            // Clean up: delete the IP address
            client.delete_ip_address(ip.id).await.expect("delete failed");
        }
        ClaimOutcome::NoCapacity => println!("Prefix {} is full", prefix.prefix),
    }
}
