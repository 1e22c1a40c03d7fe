use async_trait::async_trait;

use crate::models::{ChainSnapshot, Result, WalletAddress};

/// Read-only source of chain data for one address.
///
/// `Ok(None)` means the address has no on-chain footprint (zero transactions
/// or the balance query reported an error status), a legitimate outcome
/// distinct from an `Err` on the critical calls.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn fetch_snapshot(&self, address: &WalletAddress) -> Result<Option<ChainSnapshot>>;

    /// Cheap reachability probe for health reporting.
    async fn probe(&self) -> Result<()>;

    /// Whether the client has credentials configured at all.
    fn is_configured(&self) -> bool;
}
