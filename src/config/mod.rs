//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → ProviderMultiplexer::from_config / BlockchainClient::new
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Secrets are never stored here, only the names of the env vars holding them
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    AppConfig, ChainConfig, ContractsConfig, CustodialWalletConfig, EmbeddedWalletConfig,
    InjectedWalletConfig, ObservabilityConfig, WalletsConfig,
};
