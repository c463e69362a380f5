//! Provider error types.
//!
//! Errors raised by resources and data sources. Remote failures keep the
//! client's typed error so callers can still tell a missing object from a
//! rejected token.

use crate::validation::ValidationError;
use netbox_client::NetBoxError;
use thiserror::Error;

/// Errors that can occur in provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Caller supplied an argument that can never succeed (e.g. no pools)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A configured attribute failed local validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Every candidate prefix reported that it had no free address
    #[error("None of the prefixes {attempted:?} has a free IP address")]
    PoolsExhausted {
        /// Prefix IDs in the order they were tried
        attempted: Vec<u64>,
    },

    /// A lookup that must match exactly one object matched some other number
    #[error("Data results for {data_source} returned {count} results, expected exactly one")]
    AmbiguousLookup {
        data_source: &'static str,
        count: u64,
    },

    /// NetBox API error, passed through unchanged
    #[error("NetBox error: {0}")]
    Remote(#[from] NetBoxError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
