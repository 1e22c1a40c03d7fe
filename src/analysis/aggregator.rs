use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::models::{ChainSnapshot, WalletMetrics};

const WEI_PER_ETH: u64 = 1_000_000_000_000_000_000;

/// Signals the classifier, risk scorer, and builders all read.
///
/// Reduced once from a snapshot so every downstream stage sees the same
/// numbers.
#[derive(Debug, Clone)]
pub struct WalletSignals {
    pub balance_eth: Decimal,
    pub tx_count: u64,
    pub token_transfer_count: usize,
    pub protocol_count: usize,
}

impl WalletSignals {
    pub fn from_snapshot(snapshot: &ChainSnapshot) -> Self {
        Self {
            balance_eth: wei_to_eth(&snapshot.balance_wei),
            tx_count: snapshot.tx_count,
            token_transfer_count: snapshot.token_transfers.len(),
            protocol_count: snapshot.protocols.len(),
        }
    }
}

/// Reduce a snapshot to the persisted metrics record. Infallible: a
/// malformed balance string reads as zero.
pub fn aggregate(snapshot: &ChainSnapshot) -> WalletMetrics {
    let eth = wei_to_eth(&snapshot.balance_wei);
    WalletMetrics {
        total_value: format_eth(eth),
        transactions: snapshot.tx_count,
        protocols: snapshot.protocols.len() as u32,
    }
}

pub fn wei_to_eth(balance_wei: &str) -> Decimal {
    let wei = Decimal::from_str(balance_wei).unwrap_or(Decimal::ZERO);
    wei / Decimal::from(WEI_PER_ETH)
}

pub fn format_eth(eth: Decimal) -> String {
    // Round half away from zero, then pad to a fixed four decimals.
    let rounded = eth.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.4} ETH", rounded)
}
