use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::WalletMetrics;

/// Behavioral archetype assigned to a wallet.
///
/// The classifier reaches eight of these; the remaining labels are kept so
/// the fallback-bio table stays total over everything the system has ever
/// assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Persona {
    #[serde(rename = "DeFi Degenerate")]
    DeFiDegenerate,
    #[serde(rename = "Diamond Hands HODLer")]
    DiamondHandsHodler,
    #[serde(rename = "NFT Collector")]
    NftCollector,
    #[serde(rename = "DAO Governance Expert")]
    DaoGovernanceExpert,
    #[serde(rename = "Yield Farmer")]
    YieldFarmer,
    #[serde(rename = "Memecoin Enthusiast")]
    MemecoinEnthusiast,
    #[serde(rename = "Blue Chip Investor")]
    BlueChipInvestor,
    #[serde(rename = "Protocol Explorer")]
    ProtocolExplorer,
    #[serde(rename = "Liquidity Provider")]
    LiquidityProvider,
    #[serde(rename = "Crypto Newcomer")]
    CryptoNewcomer,
    #[serde(rename = "Crypto Enthusiast")]
    CryptoEnthusiast,
}

impl Persona {
    pub fn label(&self) -> &'static str {
        match self {
            Persona::DeFiDegenerate => "DeFi Degenerate",
            Persona::DiamondHandsHodler => "Diamond Hands HODLer",
            Persona::NftCollector => "NFT Collector",
            Persona::DaoGovernanceExpert => "DAO Governance Expert",
            Persona::YieldFarmer => "Yield Farmer",
            Persona::MemecoinEnthusiast => "Memecoin Enthusiast",
            Persona::BlueChipInvestor => "Blue Chip Investor",
            Persona::ProtocolExplorer => "Protocol Explorer",
            Persona::LiquidityProvider => "Liquidity Provider",
            Persona::CryptoNewcomer => "Crypto Newcomer",
            Persona::CryptoEnthusiast => "Crypto Enthusiast",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "DeFi Degenerate" => Some(Persona::DeFiDegenerate),
            "Diamond Hands HODLer" => Some(Persona::DiamondHandsHodler),
            "NFT Collector" => Some(Persona::NftCollector),
            "DAO Governance Expert" => Some(Persona::DaoGovernanceExpert),
            "Yield Farmer" => Some(Persona::YieldFarmer),
            "Memecoin Enthusiast" => Some(Persona::MemecoinEnthusiast),
            "Blue Chip Investor" => Some(Persona::BlueChipInvestor),
            "Protocol Explorer" => Some(Persona::ProtocolExplorer),
            "Liquidity Provider" => Some(Persona::LiquidityProvider),
            "Crypto Newcomer" => Some(Persona::CryptoNewcomer),
            "Crypto Enthusiast" => Some(Persona::CryptoEnthusiast),
            _ => None,
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One notable event in a wallet's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub event: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// An achievement badge earned by a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub label: String,
    pub description: String,
}

/// The full user-facing analysis for one wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletReport {
    pub persona: Persona,
    pub risk_score: u8,
    pub bio: String,
    pub timeline: Vec<TimelineEvent>,
    pub metrics: WalletMetrics,
    pub badges: Vec<Badge>,
}
