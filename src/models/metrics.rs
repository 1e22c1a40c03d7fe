use serde::{Deserialize, Serialize};

/// Derived, persisted subset of a `ChainSnapshot`.
///
/// Produced by the aggregator and immutable afterwards. `total_value` is the
/// human-formatted native balance ("1.2345 ETH"), serialized with the wire
/// casing the report consumers expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletMetrics {
    #[serde(rename = "totalValue")]
    pub total_value: String,
    pub transactions: u64,
    pub protocols: u32,
}
