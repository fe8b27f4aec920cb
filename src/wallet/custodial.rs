//! Custodial smart-account wallet.
//!
//! The custodian holds the keys and exposes a small HTTP API:
//!
//! ```text
//! POST /wallet/connect       {app_address}               → {address}   (404: no wallet yet)
//! POST /wallet/create        {app_address}               → {address}
//! POST /wallet/sign          {address, message}          → {signature}
//! POST /wallet/transactions  {from, to, value, data, ..} → {tx_hash}
//! GET  /wallet/status?address=..                         → {connected}
//! POST /wallet/disconnect    {app_address}
//! ```
//!
//! 401/403 mean the user declined in the custodian's own approval flow.
//! Once a transaction hash comes back, confirmation is tracked over RPC.

use alloy::primitives::{Address, Bytes, Signature, TxHash, U256};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::types::ChainConfig;
use crate::blockchain::{wait_for_confirmation, BlockchainClient, CallParams, Receipt, TransactionParams};
use crate::config::CustodialWalletConfig;
use crate::error::{Error, Result};
use crate::wallet::backend::WalletBackend;
use crate::wallet::handle::ProviderHandle;
use crate::wallet::kind::WalletKind;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Serialize)]
struct AppRequest<'a> {
    app_address: &'a str,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    address: Address,
}

#[derive(Debug, Serialize)]
struct SignRequest {
    address: Address,
    message: Bytes,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    signature: Bytes,
}

#[derive(Debug, Serialize)]
struct SendRequest {
    from: Address,
    to: Address,
    /// Decimal wei.
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gas_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gas_price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    tx_hash: TxHash,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    connected: bool,
}

/// HTTP plumbing shared by the backend and its handles.
#[derive(Clone)]
struct CustodianApi {
    http: reqwest::Client,
    base: url::Url,
    api_key: Option<String>,
}

impl CustodianApi {
    fn endpoint(&self, path: &str) -> Result<url::Url> {
        self.base
            .join(path)
            .map_err(|e| Error::BackendUnavailable(format!("Invalid custodian path '{}': {}", path, e)))
    }

    fn with_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        let url = self.endpoint(path)?;
        self.with_key(self.http.post(url).json(body))
            .send()
            .await
            .map_err(|e| Error::Network(format!("Custodian request failed: {}", e)))
    }
}

/// Classify a non-success custodian response.
async fn status_error(response: reqwest::Response, on_client_error: fn(String) -> Error) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::UserRejected(body),
        s if s.is_client_error() => on_client_error(format!("{}: {}", s, body)),
        s => Error::Network(format!("Custodian returned {}: {}", s, body)),
    }
}

/// Backend for the custodian service.
pub struct CustodialBackend {
    api: CustodianApi,
    app_address: String,
    chain: ChainConfig,
}

impl CustodialBackend {
    pub fn from_config(config: &CustodialWalletConfig, chain: ChainConfig) -> Result<Self> {
        let mut base: url::Url = config.api_url.parse().map_err(|e| {
            Error::BackendUnavailable(format!("Invalid custodian URL '{}': {}", config.api_url, e))
        })?;
        // Keep any path prefix when joining endpoint paths.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            tracing::debug!(env = %config.api_key_env, "No custodian API key set");
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(chain.rpc_timeout_secs))
            .build()
            .map_err(|e| Error::BackendUnavailable(e.to_string()))?;

        Ok(Self {
            api: CustodianApi { http, base, api_key },
            app_address: config.app_address.clone(),
            chain,
        })
    }

    async fn request_account(&self, path: &str) -> Result<Option<Address>> {
        let response = self
            .api
            .post(path, &AppRequest { app_address: &self.app_address })
            .await
            .map_err(|e| Error::BackendUnavailable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(match status_error(response, Error::BackendUnavailable).await {
                Error::Network(msg) => Error::BackendUnavailable(msg),
                other => other,
            });
        }

        let account: AccountResponse = response
            .json()
            .await
            .map_err(|e| Error::BackendUnavailable(format!("Malformed custodian response: {}", e)))?;
        Ok(Some(account.address))
    }
}

#[async_trait]
impl WalletBackend for CustodialBackend {
    fn kind(&self) -> WalletKind {
        WalletKind::Custodial
    }

    async fn connect(&self) -> Result<Arc<dyn ProviderHandle>> {
        let address = match self.request_account("wallet/connect").await? {
            Some(address) => address,
            None => {
                tracing::info!("No custodial wallet for this user yet, creating one");
                self.request_account("wallet/create").await?.ok_or_else(|| {
                    Error::BackendUnavailable("Custodian could not create a wallet".to_string())
                })?
            }
        };

        let reader = BlockchainClient::new(self.chain.clone())
            .map_err(|e| Error::BackendUnavailable(e.to_string()))?;

        tracing::info!(address = %address, "Custodial wallet connected");
        Ok(Arc::new(CustodialHandle {
            address,
            api: self.api.clone(),
            reader,
        }))
    }

    async fn disconnect(&self) -> Result<()> {
        let response = self
            .api
            .post("wallet/disconnect", &AppRequest { app_address: &self.app_address })
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response, Error::BackendUnavailable).await)
        }
    }
}

/// Handle for one custodial account.
pub struct CustodialHandle {
    address: Address,
    api: CustodianApi,
    reader: BlockchainClient,
}

#[async_trait]
impl ProviderHandle for CustodialHandle {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        let request = SignRequest {
            address: self.address,
            message: Bytes::copy_from_slice(message),
        };
        let response = self.api.post("wallet/sign", &request).await?;
        if !response.status().is_success() {
            return Err(status_error(response, Error::Signing).await);
        }
        let signed: SignResponse = response
            .json()
            .await
            .map_err(|e| Error::Signing(format!("Malformed custodian response: {}", e)))?;
        Signature::from_raw(&signed.signature).map_err(|e| Error::Signing(format!("Malformed signature: {}", e)))
    }

    async fn send_transaction(&self, params: TransactionParams) -> Result<Receipt> {
        let request = SendRequest {
            from: params.from.unwrap_or(self.address),
            to: params.to,
            value: params.value.map(|v| v.to_string()),
            data: params.data,
            gas_limit: params.gas_limit,
            gas_price: params.gas_price.map(|p| p.to_string()),
        };
        let response = self.api.post("wallet/transactions", &request).await?;
        if !response.status().is_success() {
            return Err(status_error(response, Error::SubmissionRejected).await);
        }
        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| Error::Network(format!("Malformed custodian response: {}", e)))?;

        tracing::info!(tx_hash = %sent.tx_hash, "Custodial transaction broadcast, awaiting confirmation");
        wait_for_confirmation(&self.reader, sent.tx_hash).await
    }

    async fn call(&self, params: CallParams) -> Result<Bytes> {
        self.reader.call(params.into_request()).await
    }

    async fn get_balance(&self, address: Address) -> Result<U256> {
        self.reader.get_balance(address).await
    }

    async fn is_connected(&self) -> bool {
        let url = match self.api.endpoint("wallet/status") {
            Ok(url) => url,
            Err(_) => return true,
        };
        let request = self
            .api
            .with_key(self.api.http.get(url).query(&[("address", self.address.to_string())]));

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Could not reach custodian for status");
                return true;
            }
        };
        if response.status() == StatusCode::UNAUTHORIZED || response.status() == StatusCode::NOT_FOUND {
            return false;
        }
        match response.json::<StatusResponse>().await {
            Ok(status) => status.connected,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed custodian status response");
                true
            }
        }
    }
}
