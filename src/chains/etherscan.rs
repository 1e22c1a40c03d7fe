use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::{
    chains::ChainClient,
    config::ExplorerSettings,
    models::{
        ChainSnapshot, ExplorerTransaction, PersonaError, Result, TokenTransfer, WalletAddress,
        TOKEN_WINDOW,
    },
};

const SERVICE: &str = "etherscan";
const HISTORY_PAGE_SIZE: u32 = 50;
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Standard explorer envelope: `status` is "1" on success, "0" otherwise.
#[derive(Debug, Deserialize)]
struct ExplorerEnvelope<T> {
    status: String,
    #[allow(dead_code)]
    message: String,
    result: T,
}

/// Envelope for the eth-proxy endpoints, which follow JSON-RPC shape.
#[derive(Debug, Deserialize)]
struct ProxyEnvelope {
    result: String,
}

/// Block-explorer client for a single EVM chain.
///
/// Balance and transaction-count queries are load-bearing: a transport
/// failure on either aborts the fetch. History and token-transfer queries
/// degrade to empty lists.
pub struct EtherscanClient {
    http_client: reqwest::Client,
    settings: ExplorerSettings,
}

impl EtherscanClient {
    pub fn new(settings: ExplorerSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.history_timeout())
            .build()
            .map_err(|e| PersonaError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            settings,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<T> {
        let response = self
            .http_client
            .get(&self.settings.base_url)
            .query(query)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| PersonaError::Upstream {
                service: SERVICE.to_string(),
                message: format!("request failed: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(PersonaError::Upstream {
                service: SERVICE.to_string(),
                message: format!("status {}", response.status()),
            });
        }

        response.json::<T>().await.map_err(|e| PersonaError::Upstream {
            service: SERVICE.to_string(),
            message: format!("malformed response: {}", e),
        })
    }

    async fn fetch_balance(&self, address: &WalletAddress, key: &str) -> Result<ExplorerEnvelope<String>> {
        self.get_json(
            &[
                ("module", "account"),
                ("action", "balance"),
                ("address", address.as_str()),
                ("tag", "latest"),
                ("apikey", key),
            ],
            self.settings.critical_timeout(),
        )
        .await
    }

    async fn fetch_tx_count(&self, address: &WalletAddress, key: &str) -> Result<u64> {
        let envelope: ProxyEnvelope = self
            .get_json(
                &[
                    ("module", "proxy"),
                    ("action", "eth_getTransactionCount"),
                    ("address", address.as_str()),
                    ("tag", "latest"),
                    ("apikey", key),
                ],
                self.settings.critical_timeout(),
            )
            .await?;

        let hex = envelope.result.trim_start_matches("0x");
        u64::from_str_radix(hex, 16).map_err(|_| PersonaError::Upstream {
            service: SERVICE.to_string(),
            message: format!("unparseable transaction count: {}", envelope.result),
        })
    }

    /// Best-effort page of recent transactions, newest first.
    async fn fetch_transactions(
        &self,
        address: &WalletAddress,
        key: &str,
    ) -> Vec<ExplorerTransaction> {
        let page_size = HISTORY_PAGE_SIZE.to_string();
        let result: Result<ExplorerEnvelope<Vec<ExplorerTransaction>>> = self
            .get_json(
                &[
                    ("module", "account"),
                    ("action", "txlist"),
                    ("address", address.as_str()),
                    ("startblock", "0"),
                    ("endblock", "99999999"),
                    ("page", "1"),
                    ("offset", &page_size),
                    ("sort", "desc"),
                    ("apikey", key),
                ],
                self.settings.history_timeout(),
            )
            .await;

        match result {
            Ok(envelope) => envelope.result,
            Err(e) => {
                warn!("Transaction history unavailable for {}: {}", address, e);
                Vec::new()
            }
        }
    }

    /// Best-effort page of recent token transfers, newest first.
    async fn fetch_token_transfers(&self, address: &WalletAddress, key: &str) -> Vec<TokenTransfer> {
        let page_size = HISTORY_PAGE_SIZE.to_string();
        let result: Result<ExplorerEnvelope<Vec<TokenTransfer>>> = self
            .get_json(
                &[
                    ("module", "account"),
                    ("action", "tokentx"),
                    ("address", address.as_str()),
                    ("page", "1"),
                    ("offset", &page_size),
                    ("sort", "desc"),
                    ("apikey", key),
                ],
                self.settings.history_timeout(),
            )
            .await;

        match result {
            Ok(envelope) => envelope.result,
            Err(e) => {
                warn!("Token transfers unavailable for {}: {}", address, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl ChainClient for EtherscanClient {
    async fn fetch_snapshot(&self, address: &WalletAddress) -> Result<Option<ChainSnapshot>> {
        let Some(key) = self.settings.api_key.clone() else {
            error!("Explorer API key not configured");
            return Ok(None);
        };

        debug!("Fetching balance for {}", address);
        let balance = self.fetch_balance(address, &key).await?;

        debug!("Fetching transaction count for {}", address);
        let tx_count = self.fetch_tx_count(address, &key).await?;

        // An address that never transacted and an errored balance query both
        // read as "no footprint" to the caller.
        if balance.status != "1" || tx_count == 0 {
            info!("No on-chain activity for {}", address);
            return Ok(None);
        }

        debug!("Fetching transaction history for {}", address);
        let transactions = self.fetch_transactions(address, &key).await;

        debug!("Fetching token transfers for {}", address);
        let mut token_transfers = self.fetch_token_transfers(address, &key).await;
        token_transfers.truncate(TOKEN_WINDOW);

        let protocols = ChainSnapshot::derive_protocols(address.as_str(), &transactions);

        // History arrives newest first: last row is the earliest transaction.
        let first_tx = transactions
            .last()
            .and_then(|tx| ChainSnapshot::parse_timestamp(&tx.time_stamp));
        let last_tx = transactions
            .first()
            .and_then(|tx| ChainSnapshot::parse_timestamp(&tx.time_stamp));

        info!(
            "Snapshot for {}: {} txs, {} token transfers, {} protocols",
            address,
            tx_count,
            token_transfers.len(),
            protocols.len()
        );

        Ok(Some(ChainSnapshot {
            balance_wei: balance.result,
            tx_count,
            transactions,
            token_transfers,
            protocols,
            first_tx,
            last_tx,
        }))
    }

    async fn probe(&self) -> Result<()> {
        let key = self.settings.api_key.clone().ok_or_else(|| {
            PersonaError::ConfigError("Explorer API key not configured".to_string())
        })?;

        let _: ExplorerEnvelope<serde_json::Value> = self
            .get_json(
                &[("module", "stats"), ("action", "ethsupply"), ("apikey", &key)],
                PROBE_TIMEOUT,
            )
            .await?;

        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.settings.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn client(api_key: Option<&str>) -> EtherscanClient {
        let mut settings = Settings::default().explorer;
        settings.api_key = api_key.map(String::from);
        EtherscanClient::new(settings).unwrap()
    }

    #[tokio::test]
    async fn missing_key_reads_as_no_footprint() {
        let client = client(None);
        let address = WalletAddress::parse("0x742d35cc6634c0532925a3b844bc9e7595f6e842").unwrap();
        let snapshot = client.fetch_snapshot(&address).await.unwrap();
        assert!(snapshot.is_none());
        assert!(!client.is_configured());
    }

    #[test]
    fn envelope_parses_list_result() {
        let body = r#"{
            "status": "1",
            "message": "OK",
            "result": [{
                "hash": "0xdead",
                "from": "0x1",
                "to": "0x2",
                "value": "1000",
                "timeStamp": "1700000000"
            }]
        }"#;
        let envelope: ExplorerEnvelope<Vec<ExplorerTransaction>> =
            serde_json::from_str(body).unwrap();
        assert_eq!(envelope.status, "1");
        assert_eq!(envelope.result.len(), 1);
        assert_eq!(envelope.result[0].time_stamp, "1700000000");
    }

    #[test]
    fn proxy_envelope_parses_hex_count() {
        let envelope: ProxyEnvelope = serde_json::from_str(r#"{"result": "0x2a"}"#).unwrap();
        let count = u64::from_str_radix(envelope.result.trim_start_matches("0x"), 16).unwrap();
        assert_eq!(count, 42);
    }
}
