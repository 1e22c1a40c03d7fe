pub mod aggregator;
pub mod classifier;
pub mod engine;
pub mod narrative;
pub mod risk;
pub mod timeline;

pub use aggregator::{aggregate, format_eth, wei_to_eth, WalletSignals};
pub use classifier::classify;
pub use engine::AnalysisEngine;
pub use narrative::{default_bio, NarrativeGenerator};
pub use risk::risk_score;
pub use timeline::{build_badges, build_timeline};
