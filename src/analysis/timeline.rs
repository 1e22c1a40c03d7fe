use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    analysis::WalletSignals,
    models::{Badge, ChainSnapshot, Persona, TimelineEvent},
};

/// Build the wallet's timeline. Events are emitted in a fixed order, each
/// gated on its precondition; insertion order is what fresh responses serve.
pub fn build_timeline(snapshot: &ChainSnapshot, now: DateTime<Utc>) -> Vec<TimelineEvent> {
    let mut timeline = Vec::new();
    let today = now.format("%Y-%m-%d").to_string();

    if let Some(first_tx) = snapshot.first_tx {
        timeline.push(TimelineEvent {
            event: "First Transaction".to_string(),
            date: first_tx.format("%Y-%m-%d").to_string(),
            value: Some("Entered the crypto space".to_string()),
        });
    }

    if !snapshot.token_transfers.is_empty() {
        timeline.push(TimelineEvent {
            event: "Token Activity".to_string(),
            date: today.clone(),
            value: Some(format!(
                "Interacted with {} different tokens",
                snapshot.token_transfers.len()
            )),
        });
    }

    if !snapshot.protocols.is_empty() {
        timeline.push(TimelineEvent {
            event: "DeFi Exploration".to_string(),
            date: today,
            value: Some(format!(
                "Used {} different protocols",
                snapshot.protocols.len()
            )),
        });
    }

    timeline
}

/// Evaluate the four badge conditions independently. Labels are distinct by
/// construction; no dedup is applied.
pub fn build_badges(signals: &WalletSignals, persona: Persona) -> Vec<Badge> {
    let mut badges = Vec::new();

    if signals.tx_count > 100 {
        badges.push(Badge {
            label: "Active Trader".to_string(),
            description: "Made over 100 transactions".to_string(),
        });
    }

    if signals.protocol_count > 5 {
        badges.push(Badge {
            label: "Protocol Explorer".to_string(),
            description: "Interacted with multiple DeFi protocols".to_string(),
        });
    }

    if signals.balance_eth > Decimal::ONE {
        badges.push(Badge {
            label: "Whale Spotter".to_string(),
            description: "Holds significant ETH balance".to_string(),
        });
    }

    if persona.label().contains("HODLer") {
        badges.push(Badge {
            label: "Diamond Hands".to_string(),
            description: "True HODLer mentality".to_string(),
        });
    }

    badges
}
