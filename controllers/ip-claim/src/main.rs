//! IP Claim
//!
//! Claims IP addresses from NetBox without hardcoding addresses: the next
//! free address comes from the first listed prefix that still has room.
//!
//! ## Usage
//! ```bash
//! # Claim from prefix 12, falling back to 13
//! ip-claim claim --prefix 12 --prefix 13 --description "pxe server"
//!
//! # Claim from every prefix tagged "pxe"
//! ip-claim claim --prefix-tag pxe --dns-name pxe.example.com
//!
//! # Inspect and release
//! ip-claim show 42
//! ip-claim release 42
//! ```
//!
//! Configuration comes from `NETBOX_URL`, `NETBOX_TOKEN` and
//! `NETBOX_TIMEOUT_SECS`; log verbosity from `RUST_LOG`. Results are printed
//! to stdout as JSON, logs go to stderr.

mod commands;

use clap::{Parser, Subcommand};
use netbox_client::{IPAddressRole, IPAddressStatus};
use netbox_provider::validation;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ip-claim", about = "Pooled IP allocation against NetBox", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Claim the next free IP address from the first prefix with room
    Claim(ClaimArgs),

    /// Show an IP address by ID
    Show { id: u64 },

    /// Delete an IP address; an address already gone is not an error
    Release { id: u64 },

    /// Look up a site by slug
    Site { slug: String },

    /// Look up a prefix/VLAN role by slug
    Role { slug: String },

    /// Look up a VLAN by VID
    Vlan {
        vid: u16,

        /// Only match inside this VLAN group
        #[arg(long)]
        group: Option<u64>,
    },

    /// List the IDs of prefixes carrying every given tag
    Prefixes {
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Check that NetBox accepts the token
    Check,
}

#[derive(Debug, clap::Args)]
struct ClaimArgs {
    /// Prefix ID to claim from; repeat to give fallbacks in order
    #[arg(long = "prefix")]
    prefixes: Vec<u64>,

    /// Also claim from prefixes with this tag, after the explicit ones
    #[arg(long = "prefix-tag")]
    prefix_tags: Vec<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    dns_name: Option<String>,

    #[arg(long, default_value = "active", value_parser = status_arg)]
    status: IPAddressStatus,

    #[arg(long, value_parser = role_arg)]
    role: Option<IPAddressRole>,

    /// Tag name for the claimed address; repeatable
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Device interface to assign the address to
    #[arg(long)]
    interface: Option<u64>,

    #[arg(long)]
    tenant: Option<u64>,

    #[arg(long)]
    vrf: Option<u64>,

    #[arg(long)]
    nat_inside: Option<u64>,

    #[arg(long)]
    nat_outside: Option<u64>,
}

fn status_arg(value: &str) -> Result<IPAddressStatus, validation::ValidationError> {
    validation::parse_ip_status("status", value)
}

fn role_arg(value: &str) -> Result<IPAddressRole, validation::ValidationError> {
    validation::parse_ip_role("role", value)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = netbox_provider::ProviderConfig::from_env()?;

    info!("Configuration:");
    info!("  NetBox URL: {}", config.url);
    info!("  Timeout: {}s", config.timeout.as_secs());

    let provider = netbox_provider::Provider::from_config(&config)?;
    let output = commands::execute(&provider, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
