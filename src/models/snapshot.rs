use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Zero address; transfers to it are burns, not protocol interactions.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Maximum distinct counter-party contracts tracked per wallet.
pub const PROTOCOL_CAP: usize = 10;

/// Token-transfer window retained for persona logic.
pub const TOKEN_WINDOW: usize = 20;

/// One row from the explorer's normal-transaction listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerTransaction {
    pub hash: String,
    pub from: String,
    pub to: String,
    pub value: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
}

/// One row from the explorer's token-transfer listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub hash: String,
    pub from: String,
    pub to: String,
    #[serde(rename = "contractAddress")]
    pub contract_address: String,
    #[serde(rename = "tokenSymbol")]
    pub token_symbol: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
}

/// Raw chain data for one address at one point in time.
///
/// Built fresh per request and never persisted as-is; the aggregator reduces
/// it to a `WalletMetrics` and the rest of the pipeline reads it alongside.
#[derive(Debug, Clone)]
pub struct ChainSnapshot {
    /// Native balance in wei, as reported by the explorer.
    pub balance_wei: String,
    pub tx_count: u64,
    /// Recent transactions, newest first, bounded page.
    pub transactions: Vec<ExplorerTransaction>,
    /// Recent token transfers, newest first, capped at `TOKEN_WINDOW`.
    pub token_transfers: Vec<TokenTransfer>,
    /// Distinct counter-party contracts, insertion-ordered, capped at
    /// `PROTOCOL_CAP`.
    pub protocols: Vec<String>,
    pub first_tx: Option<DateTime<Utc>>,
    pub last_tx: Option<DateTime<Utc>>,
}

impl ChainSnapshot {
    /// Extract the protocol set from a transaction window: every distinct
    /// `to` address except the wallet itself and the zero address.
    pub fn derive_protocols(address: &str, transactions: &[ExplorerTransaction]) -> Vec<String> {
        let mut protocols: Vec<String> = Vec::new();
        for tx in transactions {
            let to = tx.to.to_lowercase();
            if to.is_empty() || to == address || to == ZERO_ADDRESS {
                continue;
            }
            if !protocols.contains(&to) {
                protocols.push(to);
            }
        }
        protocols.truncate(PROTOCOL_CAP);
        protocols
    }

    /// Parse an explorer unix-seconds timestamp field.
    pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        raw.parse::<i64>().ok().and_then(|s| DateTime::from_timestamp(s, 0))
    }
}
