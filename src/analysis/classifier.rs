use rust_decimal::Decimal;

use crate::analysis::WalletSignals;
use crate::models::Persona;

type Predicate = fn(&WalletSignals) -> bool;

/// The rule order is a contract: more extreme behavior sits above more
/// general behavior, so a high-activity wallet can never fall through to a
/// newcomer label. First match wins.
fn rules() -> [(Predicate, Persona); 7] {
    [
        (
            |s| s.tx_count > 500 && s.protocol_count > 5,
            Persona::DeFiDegenerate,
        ),
        (
            |s| s.tx_count < 50 && s.balance_eth > Decimal::ONE,
            Persona::DiamondHandsHodler,
        ),
        (|s| s.token_transfer_count > 20, Persona::NftCollector),
        (
            |s| s.tx_count > 100 && s.protocol_count > 2,
            Persona::YieldFarmer,
        ),
        (
            |s| s.balance_eth > Decimal::new(5, 1) && s.tx_count < 100,
            Persona::BlueChipInvestor,
        ),
        (|s| s.protocol_count > 3, Persona::ProtocolExplorer),
        (|s| s.tx_count < 10, Persona::CryptoNewcomer),
    ]
}

/// Assign exactly one persona. Total and deterministic.
pub fn classify(signals: &WalletSignals) -> Persona {
    for (predicate, persona) in rules() {
        if predicate(signals) {
            return persona;
        }
    }
    Persona::CryptoEnthusiast
}
