use rust_decimal::Decimal;

use crate::analysis::WalletSignals;

const BASE_SCORE: i32 = 50;

/// Weighted risk score in [0, 100].
///
/// Each dimension (balance, activity, protocol spread) applies at most one
/// bracket; the brackets of different dimensions stack. Clamping happens once
/// at the end so stacked adjustments cannot escape the range.
pub fn risk_score(signals: &WalletSignals) -> u8 {
    let mut score = BASE_SCORE;

    // Higher balance reads as lower risk.
    if signals.balance_eth > Decimal::from(10) {
        score -= 20;
    } else if signals.balance_eth > Decimal::ONE {
        score -= 10;
    } else if signals.balance_eth < Decimal::new(1, 2) {
        score += 15;
    }

    // Heavy activity raises exposure; near-zero activity is its own risk.
    if signals.tx_count > 1000 {
        score += 15;
    } else if signals.tx_count > 100 {
        score += 5;
    } else if signals.tx_count < 10 {
        score += 10;
    }

    // Every additional protocol is attack surface.
    if signals.protocol_count > 10 {
        score += 20;
    } else if signals.protocol_count > 5 {
        score += 10;
    }

    score.clamp(0, 100) as u8
}
