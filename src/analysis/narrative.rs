use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::{
    analysis::WalletSignals,
    config::NarrativeSettings,
    models::{PersonaError, Persona, Result},
};

const SERVICE: &str = "gemini";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

/// Produces the short persona bio.
///
/// Prefers the generative backend; any failure there (no key, transport
/// error, timeout, unexpected body shape) falls back to the static table.
/// `generate` is total; it never surfaces an error to the pipeline.
#[derive(Clone)]
pub struct NarrativeGenerator {
    http_client: reqwest::Client,
    settings: NarrativeSettings,
}

impl NarrativeGenerator {
    pub fn new(settings: NarrativeSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| PersonaError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            settings,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.settings.api_key.is_some()
    }

    pub async fn generate(&self, persona: Persona, signals: &WalletSignals) -> String {
        let Some(key) = self.settings.api_key.clone() else {
            return default_bio(persona).to_string();
        };

        match self.generate_remote(persona, signals, &key).await {
            Ok(bio) => bio,
            Err(e) => {
                warn!("Bio generation via {} failed: {}", SERVICE, e);
                default_bio(persona).to_string()
            }
        }
    }

    async fn generate_remote(
        &self,
        persona: Persona,
        signals: &WalletSignals,
        key: &str,
    ) -> Result<String> {
        let prompt = build_prompt(persona, signals);
        debug!("Requesting bio for persona {}", persona);

        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let response = self
            .http_client
            .post(&self.settings.base_url)
            .query(&[("key", key)])
            .json(&body)
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

        let parsed: GenerateResponse =
            response.json().await.map_err(|e| PersonaError::Upstream {
                service: SERVICE.to_string(),
                message: format!("malformed response: {}", e),
            })?;

        parsed
            .candidates
            .and_then(|mut c| c.drain(..).next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|mut p| p.drain(..).next())
            .map(|p| p.text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| PersonaError::Upstream {
                service: SERVICE.to_string(),
                message: "empty candidate list".to_string(),
            })
    }
}

fn build_prompt(persona: Persona, signals: &WalletSignals) -> String {
    format!(
        "Create a witty, short bio (2-3 sentences) for a crypto wallet persona: \"{}\". \
         Wallet stats: {} transactions, {:.2} ETH balance, {} protocols used. \
         Make it fun and crypto-native with some humor. Don't use too many emojis.",
        persona, signals.tx_count, signals.balance_eth, signals.protocol_count
    )
}

/// Static fallback table. Covers every persona plus a final default, so bio
/// generation is total even if the label set drifts.
pub fn default_bio(persona: Persona) -> &'static str {
    match persona {
        Persona::DeFiDegenerate => {
            "Lives and breathes DeFi protocols. Probably has more yield farms than friends. Risk tolerance: Yes."
        }
        Persona::NftCollector => {
            "Collects digital art like it's going out of style. Portfolio is more colorful than their personality."
        }
        Persona::DiamondHandsHodler => {
            "Diamond hands since day one. Hasn't checked portfolio prices since 2021 (lies, checks hourly)."
        }
        Persona::DaoGovernanceExpert => {
            "Votes on everything, even what to have for lunch. Governance token maximalist."
        }
        Persona::YieldFarmer => {
            "Chasing yields across the DeFi landscape. APY hunter extraordinaire."
        }
        Persona::MemecoinEnthusiast => {
            "Buys the hype, sells the news. Portfolio chart looks like a seismograph."
        }
        Persona::BlueChipInvestor => {
            "Only buys the top 10. Conservative by crypto standards, reckless by traditional ones."
        }
        Persona::ProtocolExplorer => {
            "Tries every new protocol. Beta tester by choice, bug finder by accident."
        }
        Persona::LiquidityProvider => {
            "Provides liquidity to the masses. Impermanent loss is just a suggestion."
        }
        Persona::CryptoNewcomer => {
            "Fresh to the space but eager to learn. Still figuring out the difference between staking and stacking."
        }
        Persona::CryptoEnthusiast => {
            "A mysterious crypto enthusiast navigating the blockchain wilderness with style."
        }
    }
}
