//! Configuration validation.
//!
//! Serde handles syntax; this checks values: URLs parse, addresses parse,
//! timeouts are non-zero, at least one wallet backend is enabled. All errors
//! are collected, not just the first.

use alloy::primitives::Address;
use std::fmt;

use crate::config::schema::AppConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let chain = &config.chain;
    if chain.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::new("chain.rpc_url", format!("invalid URL '{}'", chain.rpc_url)));
    }
    for (i, failover) in chain.failover_urls.iter().enumerate() {
        if failover.parse::<url::Url>().is_err() {
            errors.push(ValidationError::new(
                &format!("chain.failover_urls[{}]", i),
                format!("invalid URL '{}'", failover),
            ));
        }
    }
    if chain.chain_id == 0 {
        errors.push(ValidationError::new("chain.chain_id", "must be non-zero"));
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be non-zero"));
    }
    if chain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.confirmation_timeout_secs", "must be non-zero"));
    }
    if chain.poll_interval_ms == 0 {
        errors.push(ValidationError::new("chain.poll_interval_ms", "must be non-zero"));
    }
    if !chain.gas_price_multiplier.is_finite() || chain.gas_price_multiplier < 1.0 {
        errors.push(ValidationError::new(
            "chain.gas_price_multiplier",
            "must be a finite number of at least 1.0",
        ));
    }

    let wallets = &config.wallets;
    if !wallets.embedded.enabled && !wallets.injected.enabled && !wallets.custodial.enabled {
        errors.push(ValidationError::new("wallets", "at least one wallet backend must be enabled"));
    }
    if wallets.embedded.enabled && wallets.embedded.private_key_env.is_empty() {
        errors.push(ValidationError::new("wallets.embedded.private_key_env", "must not be empty"));
    }
    if let Some(url) = &wallets.injected.rpc_url {
        if url.parse::<url::Url>().is_err() {
            errors.push(ValidationError::new("wallets.injected.rpc_url", format!("invalid URL '{}'", url)));
        }
    }
    if wallets.custodial.enabled && wallets.custodial.api_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::new(
            "wallets.custodial.api_url",
            format!("invalid URL '{}'", wallets.custodial.api_url),
        ));
    }

    for (field, value) in [
        ("contracts.lending_factory", &config.contracts.lending_factory),
        ("contracts.insurance_factory", &config.contracts.insurance_factory),
    ] {
        if let Some(addr) = value {
            if addr.parse::<Address>().is_err() {
                errors.push(ValidationError::new(field, format!("invalid address '{}'", addr)));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.chain.rpc_url = "not a url".to_string();
        config.chain.chain_id = 0;
        config.chain.gas_price_multiplier = 0.5;
        config.contracts.lending_factory = Some("0x1234".to_string());

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "chain.rpc_url",
                "chain.chain_id",
                "chain.gas_price_multiplier",
                "contracts.lending_factory"
            ]
        );
    }

    #[test]
    fn test_gas_multiplier_must_be_finite() {
        for bad in [f64::INFINITY, f64::NAN] {
            let mut config = AppConfig::default();
            config.chain.gas_price_multiplier = bad;
            let errors = validate_config(&config).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "chain.gas_price_multiplier");
        }
    }

    #[test]
    fn test_requires_a_backend() {
        let mut config = AppConfig::default();
        config.wallets.embedded.enabled = false;
        config.wallets.injected.enabled = false;
        config.wallets.custodial.enabled = false;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "wallets: at least one wallet backend must be enabled");
    }
}
