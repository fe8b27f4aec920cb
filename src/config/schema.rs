//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the wallet client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Chain connection settings.
    pub chain: ChainConfig,

    /// Wallet backend registrations.
    pub wallets: WalletsConfig,

    /// Deployed factory contracts.
    pub contracts: ContractsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (2810 for Morph Holesky, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required before a receipt is returned.
    pub confirmation_blocks: u32,

    /// Maximum time to wait for confirmation, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Gas price multiplier (1.0 = estimated, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc-quicknode-holesky.morphl2.io".to_string(),
            failover_urls: Vec::new(),
            chain_id: 2810,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 2000,
            gas_price_multiplier: 1.2,
            max_gas_price_gwei: 500,
        }
    }
}

/// One section per wallet kind.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WalletsConfig {
    pub embedded: EmbeddedWalletConfig,
    pub injected: InjectedWalletConfig,
    pub custodial: CustodialWalletConfig,
}

/// Embedded key wallet.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmbeddedWalletConfig {
    pub enabled: bool,

    /// Environment variable holding the hex private key.
    pub private_key_env: String,
}

impl Default for EmbeddedWalletConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            private_key_env: "FRODO_EMBEDDED_PRIVATE_KEY".to_string(),
        }
    }
}

/// Node-managed (extension-style) wallet.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InjectedWalletConfig {
    pub enabled: bool,

    /// Endpoint exposing `eth_requestAccounts`. Falls back to `chain.rpc_url`.
    pub rpc_url: Option<String>,
}

impl Default for InjectedWalletConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rpc_url: None,
        }
    }
}

/// Custodial wallet service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CustodialWalletConfig {
    pub enabled: bool,

    /// Base URL of the custodian API.
    pub api_url: String,

    /// Application address registered with the custodian.
    pub app_address: String,

    /// Environment variable holding the custodian API key.
    pub api_key_env: String,
}

impl Default for CustodialWalletConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: "http://localhost:3030".to_string(),
            app_address: String::new(),
            api_key_env: "FRODO_CUSTODIAL_API_KEY".to_string(),
        }
    }
}

/// Deployed factory addresses. Circle addresses are chosen per call.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractsConfig {
    pub lending_factory: Option<String>,
    pub insurance_factory: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
