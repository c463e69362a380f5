//! Subcommand handlers
//!
//! Each handler returns the JSON document printed on success.

use crate::{ClaimArgs, Command};
use anyhow::{Context, bail};
use netbox_provider::{AllocationAttributes, PoolRef, Provider};
use serde_json::{Value, json};
use tracing::info;

pub async fn execute(provider: &Provider, command: Command) -> anyhow::Result<Value> {
    match command {
        Command::Claim(args) => claim(provider, args).await,
        Command::Show { id } => show(provider, id).await,
        Command::Release { id } => {
            provider.allocator().release(id).await?;
            Ok(json!({ "released": id }))
        }
        Command::Site { slug } => Ok(serde_json::to_value(provider.data_sources().site(&slug).await?)?),
        Command::Role { slug } => Ok(serde_json::to_value(provider.data_sources().role(&slug).await?)?),
        Command::Vlan { vid, group } => {
            Ok(serde_json::to_value(provider.data_sources().vlan(vid, group).await?)?)
        }
        Command::Prefixes { tags } => Ok(serde_json::to_value(provider.data_sources().prefixes(tags).await?)?),
        Command::Check => {
            provider.check().await?;
            Ok(json!({ "token": "valid" }))
        }
    }
}

async fn claim(provider: &Provider, args: ClaimArgs) -> anyhow::Result<Value> {
    let mut pools: Vec<PoolRef> = args.prefixes.iter().copied().map(PoolRef::new).collect();
    if !args.prefix_tags.is_empty() {
        let tagged = provider
            .data_sources()
            .prefixes(args.prefix_tags.clone())
            .await
            .with_context(|| format!("looking up prefixes tagged {:?}", args.prefix_tags))?;
        for pool in tagged.pools() {
            if !pools.contains(&pool) {
                pools.push(pool);
            }
        }
    }
    info!("Claiming from prefixes {:?}", pools.iter().map(|pool| pool.id).collect::<Vec<_>>());

    let attributes = AllocationAttributes {
        description: args.description,
        dns_name: args.dns_name,
        interface_id: args.interface,
        nat_inside_id: args.nat_inside,
        nat_outside_id: args.nat_outside,
        role: args.role,
        status: args.status,
        tags: args.tags.into_iter().collect(),
        tenant_id: args.tenant,
        vrf_id: args.vrf,
    };

    let allocation = provider.allocator().claim(&pools, &attributes).await?;
    Ok(serde_json::to_value(allocation)?)
}

async fn show(provider: &Provider, id: u64) -> anyhow::Result<Value> {
    let mut current = Some(id);
    match provider.allocator().refresh(&mut current).await? {
        Some(allocation) => Ok(serde_json::to_value(allocation)?),
        None => bail!("IP address {} not found in NetBox", id),
    }
}
