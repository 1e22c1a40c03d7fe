use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wallet_persona::{
    analysis::{AnalysisEngine, NarrativeGenerator},
    chains::ChainClient,
    models::{
        Badge, ChainSnapshot, PersonaError, Result, TimelineEvent, WalletAddress,
    },
    storage::{AnalysisStore, StoredAnalysis},
    Settings,
};

/// Chain client fake serving a canned snapshot and counting fetches.
pub struct FakeChain {
    pub snapshot: Mutex<Option<ChainSnapshot>>,
    pub fetches: AtomicUsize,
    pub configured: bool,
    pub fail_fetch: AtomicBool,
}

impl FakeChain {
    pub fn new(snapshot: Option<ChainSnapshot>) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            fetches: AtomicUsize::new(0),
            configured: false,
            fail_fetch: AtomicBool::new(false),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn set_snapshot(&self, snapshot: Option<ChainSnapshot>) {
        *self.snapshot.lock().unwrap() = snapshot;
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn fetch_snapshot(&self, _address: &WalletAddress) -> Result<Option<ChainSnapshot>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(PersonaError::Upstream {
                service: "etherscan".to_string(),
                message: "balance query timed out".to_string(),
            });
        }
        Ok(self.snapshot.lock().unwrap().clone())
    }

    async fn probe(&self) -> Result<()> {
        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

#[derive(Default)]
pub struct MemoryState {
    pub analyses: HashMap<String, StoredAnalysis>,
    pub timelines: HashMap<String, Vec<TimelineEvent>>,
    pub badges: HashMap<String, Vec<Badge>>,
    pub usage: Vec<(String, String)>,
}

/// In-memory store fake with a writes-fail and a ping-fail switch.
#[derive(Default)]
pub struct MemoryStore {
    pub state: Mutex<MemoryState>,
    pub fail_writes: AtomicBool,
    pub fail_ping: AtomicBool,
}

impl MemoryStore {
    fn write_guard(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(PersonaError::ConfigError("writes disabled".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn get_analysis(&self, address: &WalletAddress) -> Result<Option<StoredAnalysis>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .analyses
            .get(address.as_str())
            .cloned())
    }

    async fn upsert_analysis(&self, record: &StoredAnalysis) -> Result<()> {
        self.write_guard()?;
        self.state
            .lock()
            .unwrap()
            .analyses
            .insert(record.wallet_address.clone(), record.clone());
        Ok(())
    }

    async fn replace_timeline(
        &self,
        address: &WalletAddress,
        events: &[TimelineEvent],
    ) -> Result<()> {
        self.write_guard()?;
        self.state
            .lock()
            .unwrap()
            .timelines
            .insert(address.as_str().to_string(), events.to_vec());
        Ok(())
    }

    async fn replace_badges(&self, address: &WalletAddress, badges: &[Badge]) -> Result<()> {
        self.write_guard()?;
        self.state
            .lock()
            .unwrap()
            .badges
            .insert(address.as_str().to_string(), badges.to_vec());
        Ok(())
    }

    async fn load_timeline(&self, address: &WalletAddress) -> Result<Vec<TimelineEvent>> {
        let mut events = self
            .state
            .lock()
            .unwrap()
            .timelines
            .get(address.as_str())
            .cloned()
            .unwrap_or_default();
        events.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(events)
    }

    async fn load_badges(&self, address: &WalletAddress) -> Result<Vec<Badge>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .badges
            .get(address.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn log_usage(&self, address: &WalletAddress, endpoint: &str) -> Result<()> {
        self.write_guard()?;
        self.state
            .lock()
            .unwrap()
            .usage
            .push((address.as_str().to_string(), endpoint.to_string()));
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        if self.fail_ping.load(Ordering::SeqCst) {
            Err(PersonaError::ConfigError("storage offline".to_string()))
        } else {
            Ok(())
        }
    }
}

pub const TEST_ADDRESS: &str = "0x742d35cc6634c0532925a3b844bc9e7595f6e842";

pub fn snapshot(balance_wei: &str, tx_count: u64, protocols: usize, tokens: usize) -> ChainSnapshot {
    use wallet_persona::models::{ExplorerTransaction, TokenTransfer};

    let transactions = vec![ExplorerTransaction {
        hash: "0xdead".to_string(),
        from: TEST_ADDRESS.to_string(),
        to: "0xbeef".to_string(),
        value: "1".to_string(),
        time_stamp: "1620000000".to_string(),
    }];

    ChainSnapshot {
        balance_wei: balance_wei.to_string(),
        tx_count,
        transactions,
        token_transfers: (0..tokens)
            .map(|i| TokenTransfer {
                hash: format!("0x{}", i),
                from: "0x1".to_string(),
                to: TEST_ADDRESS.to_string(),
                contract_address: "0x2".to_string(),
                token_symbol: "TOK".to_string(),
                time_stamp: "1700000000".to_string(),
            })
            .collect(),
        protocols: (0..protocols).map(|i| format!("0x{:040x}", i + 1)).collect(),
        first_tx: chrono::DateTime::from_timestamp(1_620_000_000, 0),
        last_tx: chrono::DateTime::from_timestamp(1_700_000_000, 0),
    }
}

/// Engine wired to the fakes, with the narrative backend unconfigured so
/// bios come deterministically from the fallback table.
pub fn engine(chain: Arc<FakeChain>, store: Arc<MemoryStore>) -> AnalysisEngine {
    let narrative = NarrativeGenerator::new(Settings::default().narrative).unwrap();
    AnalysisEngine::new(chain, store, narrative, Duration::hours(24))
}
