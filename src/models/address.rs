use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{PersonaError, Result};

/// A validated, normalized wallet address.
///
/// Two syntaxes are accepted: a `0x`-prefixed 40-hex-character address, or an
/// ENS name ending in `.eth`. Input is trimmed and lowercased before
/// validation; nothing downstream (network or database) ever sees an
/// unvalidated address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase();

        if is_hex_address(&normalized) || is_ens_name(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(PersonaError::InvalidAddress(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_ens(&self) -> bool {
        self.0.ends_with(".eth")
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_hex_address(s: &str) -> bool {
    s.len() == 42
        && s.starts_with("0x")
        && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}

fn is_ens_name(s: &str) -> bool {
    let Some(label) = s.strip_suffix(".eth") else {
        return false;
    };
    !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}
