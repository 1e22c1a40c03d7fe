use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    analysis::{aggregate, build_badges, build_timeline, classify, risk_score, NarrativeGenerator,
        WalletSignals},
    chains::ChainClient,
    models::{Persona, PersonaError, Result, WalletAddress, WalletMetrics, WalletReport},
    storage::{AnalysisStore, StoredAnalysis},
};

/// Runs the full analysis pipeline for one wallet per call.
///
/// Cache reads short-circuit the external calls entirely; cache writes are
/// best-effort and never fail the request.
pub struct AnalysisEngine {
    chain: Arc<dyn ChainClient>,
    store: Arc<dyn AnalysisStore>,
    narrative: NarrativeGenerator,
    freshness_window: Duration,
}

impl AnalysisEngine {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        store: Arc<dyn AnalysisStore>,
        narrative: NarrativeGenerator,
        freshness_window: Duration,
    ) -> Self {
        Self {
            chain,
            store,
            narrative,
            freshness_window,
        }
    }

    pub async fn analyze(&self, raw_address: &str) -> Result<WalletReport> {
        let address = WalletAddress::parse(raw_address)?;
        info!("Processing wallet {}", address);

        // Usage tracking is fire-and-forget.
        if let Err(e) = self.store.log_usage(&address, "analyze").await {
            warn!("Failed to log usage for {}: {}", address, e);
        }

        if let Some(report) = self.cached_report(&address).await? {
            info!("Returning cached analysis for {}", address);
            return Ok(report);
        }

        info!("Fetching fresh data for {}", address);
        let snapshot = self
            .chain
            .fetch_snapshot(&address)
            .await?
            .ok_or_else(|| PersonaError::NoFootprint(address.to_string()))?;

        let signals = WalletSignals::from_snapshot(&snapshot);
        let metrics = aggregate(&snapshot);
        let persona = classify(&signals);
        let risk = risk_score(&signals);
        let bio = self.narrative.generate(persona, &signals).await;
        let timeline = build_timeline(&snapshot, Utc::now());
        let badges = build_badges(&signals, persona);

        let report = WalletReport {
            persona,
            risk_score: risk,
            bio,
            timeline,
            metrics,
            badges,
        };

        // The computed report is the response either way; a persistence
        // failure only costs us the cache.
        if let Err(e) = self.persist(&address, &report).await {
            warn!("Failed to store analysis for {}: {}", address, e);
        }

        info!("Analysis complete for {}: {}", address, report.persona);
        Ok(report)
    }

    /// Serve the stored analysis when it is still inside the freshness
    /// window; anything older triggers recomputation.
    async fn cached_report(&self, address: &WalletAddress) -> Result<Option<WalletReport>> {
        let Some(stored) = self.store.get_analysis(address).await? else {
            return Ok(None);
        };

        let age = Utc::now().signed_duration_since(stored.updated_at);
        if age >= self.freshness_window {
            return Ok(None);
        }

        let timeline = self.store.load_timeline(address).await?;
        let badges = self.store.load_badges(address).await?;

        Ok(Some(WalletReport {
            persona: Persona::from_label(&stored.persona).unwrap_or(Persona::CryptoEnthusiast),
            risk_score: stored.risk_score.clamp(0, 100) as u8,
            bio: stored.bio,
            timeline,
            metrics: WalletMetrics {
                total_value: stored.total_value,
                transactions: stored.transaction_count.max(0) as u64,
                protocols: stored.protocol_count.max(0) as u32,
            },
            badges,
        }))
    }

    async fn persist(&self, address: &WalletAddress, report: &WalletReport) -> Result<()> {
        let record = StoredAnalysis {
            wallet_address: address.as_str().to_string(),
            persona: report.persona.label().to_string(),
            risk_score: report.risk_score as i64,
            bio: report.bio.clone(),
            total_value: report.metrics.total_value.clone(),
            transaction_count: report.metrics.transactions as i64,
            protocol_count: report.metrics.protocols as i64,
            updated_at: Utc::now(),
        };

        self.store.upsert_analysis(&record).await?;
        self.store.replace_timeline(address, &report.timeline).await?;
        self.store.replace_badges(address, &report.badges).await?;
        Ok(())
    }
}
