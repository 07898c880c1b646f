//! Registry configuration.
//!
//! Built-in defaults target the Polygon Mumbai deployment. Deployments
//! override them through a TOML document (see [`RegistryConfig::from_toml`]).

use alloy_primitives::{Address, address};
use serde::{Deserialize, Serialize};

use crate::error::GnsError;

// =============================================================================
// Defaults
// =============================================================================

/// Registry contract on Polygon Mumbai.
pub const DEFAULT_CONTRACT_ADDRESS: Address = address!("c7a9c1a4b5b2c2b7d0f3a3b1e8f47a7ad6f4e3c1");

/// Suffix shown after every registered name.
pub const DEFAULT_TLD: &str = "gang";

/// Shortest name the registry accepts.
pub const DEFAULT_MIN_NAME_LEN: usize = 3;

/// Delay between a completed mint and the listing refresh.
pub const DEFAULT_SETTLE_DELAY_MS: u32 = 2000;

/// Interval between receipt lookups while waiting for inclusion.
pub const DEFAULT_RECEIPT_POLL_MS: u32 = 1500;

// =============================================================================
// Chain Descriptor
// =============================================================================

/// Native currency metadata, as `wallet_addEthereumChain` expects it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Everything a wallet needs to add and switch to the target chain.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChainDescriptor {
    pub chain_id: u64,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    pub block_explorer_urls: Vec<String>,
}

impl ChainDescriptor {
    /// Polygon Mumbai testnet.
    pub fn polygon_mumbai() -> Self {
        Self {
            chain_id: 80001,
            chain_name: "Polygon Mumbai Testnet".to_string(),
            rpc_urls: vec!["https://rpc-mumbai.maticvigil.com/".to_string()],
            native_currency: NativeCurrency {
                name: "Mumbai Matic".to_string(),
                symbol: "MATIC".to_string(),
                decimals: 18,
            },
            block_explorer_urls: vec!["https://mumbai.polygonscan.com/".to_string()],
        }
    }

    /// Chain id as the `0x`-prefixed quantity wallets use.
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }

    pub fn explorer_url(&self) -> Option<&str> {
        self.block_explorer_urls.first().map(String::as_str)
    }

    /// Parameter object for `wallet_addEthereumChain`.
    pub fn add_chain_params(&self) -> AddChainParams<'_> {
        AddChainParams {
            chain_id: self.chain_id_hex(),
            chain_name: &self.chain_name,
            rpc_urls: &self.rpc_urls,
            native_currency: &self.native_currency,
            block_explorer_urls: &self.block_explorer_urls,
        }
    }
}

/// Wire shape of an EIP-3085 add-chain request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams<'a> {
    pub chain_id: String,
    pub chain_name: &'a str,
    pub rpc_urls: &'a [String],
    pub native_currency: &'a NativeCurrency,
    pub block_explorer_urls: &'a [String],
}

// =============================================================================
// Name Policy
// =============================================================================

/// Length bounds for candidate names.
///
/// Some registry deployments cap names at five characters, others accept any
/// length from the minimum up, so the cap is optional.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NamePolicy {
    pub min_len: usize,
    pub max_len: Option<usize>,
}

impl Default for NamePolicy {
    fn default() -> Self {
        Self {
            min_len: DEFAULT_MIN_NAME_LEN,
            max_len: None,
        }
    }
}

// =============================================================================
// Registry Config
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub contract_address: Address,
    pub tld: String,
    pub target: ChainDescriptor,
    pub names: NamePolicy,
    pub settle_delay_ms: u32,
    pub receipt_poll_ms: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_CONTRACT_ADDRESS,
            tld: DEFAULT_TLD.to_string(),
            target: ChainDescriptor::polygon_mumbai(),
            names: NamePolicy::default(),
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            receipt_poll_ms: DEFAULT_RECEIPT_POLL_MS,
        }
    }
}

impl RegistryConfig {
    /// Parse a TOML document; missing keys fall back to the defaults.
    pub fn from_toml(source: &str) -> Result<Self, GnsError> {
        let config: Self = toml::from_str(source).map_err(|e| GnsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GnsError> {
        if self.names.min_len == 0 {
            return Err(GnsError::Config("names.min_len must be at least 1".into()));
        }
        if let Some(max) = self.names.max_len
            && max < self.names.min_len
        {
            return Err(GnsError::Config(format!(
                "names.max_len ({max}) is below names.min_len ({})",
                self.names.min_len
            )));
        }
        if self.target.rpc_urls.is_empty() {
            return Err(GnsError::Config("target.rpc_urls must not be empty".into()));
        }
        Ok(())
    }
}
