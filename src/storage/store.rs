use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Badge, Result, TimelineEvent, WalletAddress};

/// Scalar row persisted for one wallet's latest analysis.
#[derive(Debug, Clone)]
pub struct StoredAnalysis {
    pub wallet_address: String,
    pub persona: String,
    pub risk_score: i64,
    pub bio: String,
    pub total_value: String,
    pub transaction_count: i64,
    pub protocol_count: i64,
    pub updated_at: DateTime<Utc>,
}

/// Narrow persistence port the cache policy depends on.
///
/// `replace_*` follow wholesale delete-then-insert semantics inside a single
/// transaction; there is no merge path, so a changed persona can never sit
/// next to stale child rows.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn get_analysis(&self, address: &WalletAddress) -> Result<Option<StoredAnalysis>>;

    async fn upsert_analysis(&self, record: &StoredAnalysis) -> Result<()>;

    async fn replace_timeline(
        &self,
        address: &WalletAddress,
        events: &[TimelineEvent],
    ) -> Result<()>;

    async fn replace_badges(&self, address: &WalletAddress, badges: &[Badge]) -> Result<()>;

    /// Timeline for the cached path, ordered by event date ascending.
    async fn load_timeline(&self, address: &WalletAddress) -> Result<Vec<TimelineEvent>>;

    async fn load_badges(&self, address: &WalletAddress) -> Result<Vec<Badge>>;

    /// Usage tracking. Callers treat failures as non-fatal.
    async fn log_usage(&self, address: &WalletAddress, endpoint: &str) -> Result<()>;

    /// Storage reachability check for health reporting.
    async fn ping(&self) -> Result<()>;
}
