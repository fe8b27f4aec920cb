//! Shared utilities for integration testing.

#![allow(dead_code)]

use alloy::primitives::{Address, Bytes, Signature, TxHash, U256};
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use frodo_wallet::blockchain::{CallParams, Receipt, TransactionParams};
use frodo_wallet::{Error, ProviderHandle, Result, WalletBackend, WalletKind};

// ---------------------------------------------------------------------------
// Scripted in-memory backends
// ---------------------------------------------------------------------------

/// How a [`MockBackend`] answers `connect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    Succeed,
    Reject,
    Unavailable,
}

/// Call counters shared between a backend and the handles it hands out.
#[derive(Debug, Default)]
pub struct Calls {
    pub connects: AtomicU32,
    pub disconnects: AtomicU32,
    pub sends: AtomicU32,
    pub calls: AtomicU32,
    pub sent: Mutex<Vec<TransactionParams>>,
}

impl Calls {
    pub fn connects(&self) -> u32 {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> u32 {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub fn sends(&self) -> u32 {
        self.sends.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Total backend/handle activity of any kind.
    pub fn total(&self) -> u32 {
        self.connects() + self.disconnects() + self.sends() + self.calls()
    }

    pub fn last_sent(&self) -> Option<TransactionParams> {
        self.sent.lock().unwrap().last().cloned()
    }
}

pub struct MockBackend {
    kind: WalletKind,
    address: Address,
    outcome: Mutex<ConnectOutcome>,
    /// Receipts come back reverted when set.
    revert: bool,
    /// Raw bytes every `call` returns.
    call_result: Bytes,
    pub calls: Arc<Calls>,
}

impl MockBackend {
    pub fn new(kind: WalletKind, address_byte: u8) -> Arc<Self> {
        Self::build(kind, address_byte, ConnectOutcome::Succeed, false, Bytes::new())
    }

    pub fn with_outcome(kind: WalletKind, address_byte: u8, outcome: ConnectOutcome) -> Arc<Self> {
        Self::build(kind, address_byte, outcome, false, Bytes::new())
    }

    pub fn reverting(kind: WalletKind, address_byte: u8) -> Arc<Self> {
        Self::build(kind, address_byte, ConnectOutcome::Succeed, true, Bytes::new())
    }

    pub fn answering(kind: WalletKind, address_byte: u8, call_result: Bytes) -> Arc<Self> {
        Self::build(kind, address_byte, ConnectOutcome::Succeed, false, call_result)
    }

    fn build(
        kind: WalletKind,
        address_byte: u8,
        outcome: ConnectOutcome,
        revert: bool,
        call_result: Bytes,
    ) -> Arc<Self> {
        Arc::new(Self {
            kind,
            address: Address::repeat_byte(address_byte),
            outcome: Mutex::new(outcome),
            revert,
            call_result,
            calls: Arc::new(Calls::default()),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn set_outcome(&self, outcome: ConnectOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }
}

#[async_trait]
impl WalletBackend for MockBackend {
    fn kind(&self) -> WalletKind {
        self.kind
    }

    async fn connect(&self) -> Result<Arc<dyn ProviderHandle>> {
        self.calls.connects.fetch_add(1, Ordering::SeqCst);
        // Yield so concurrent logins actually interleave.
        tokio::time::sleep(Duration::from_millis(5)).await;

        let outcome = *self.outcome.lock().unwrap();
        match outcome {
            ConnectOutcome::Succeed => Ok(Arc::new(MockHandle {
                address: self.address,
                revert: self.revert,
                call_result: self.call_result.clone(),
                calls: self.calls.clone(),
            })),
            ConnectOutcome::Reject => Err(Error::UserRejected("User closed the modal".into())),
            ConnectOutcome::Unavailable => Err(Error::BackendUnavailable("SDK not loaded".into())),
        }
    }

    async fn disconnect(&self) -> Result<()> {
        self.calls.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct MockHandle {
    address: Address,
    revert: bool,
    call_result: Bytes,
    calls: Arc<Calls>,
}

#[async_trait]
impl ProviderHandle for MockHandle {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_message(&self, _message: &[u8]) -> Result<Signature> {
        Err(Error::Signing("mock handle does not sign".into()))
    }

    async fn send_transaction(&self, params: TransactionParams) -> Result<Receipt> {
        self.calls.sends.fetch_add(1, Ordering::SeqCst);
        let to = params.to;
        self.calls.sent.lock().unwrap().push(params);
        Ok(Receipt {
            tx_hash: TxHash::repeat_byte(0xab),
            block_number: Some(100),
            from: self.address,
            to: Some(to),
            gas_used: 21_000,
            success: !self.revert,
        })
    }

    async fn call(&self, _params: CallParams) -> Result<Bytes> {
        self.calls.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.call_result.clone())
    }

    async fn get_balance(&self, _address: Address) -> Result<U256> {
        Ok(U256::from(1_500_000_000_000_000_000u128))
    }
}

// ---------------------------------------------------------------------------
// Programmable HTTP mock
// ---------------------------------------------------------------------------

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    /// Path including any query string.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl MockRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// JSON-RPC method name, for RPC mocks.
    pub fn rpc_method(&self) -> String {
        self.json()["method"].as_str().unwrap_or_default().to_string()
    }

    pub fn rpc_id(&self) -> Value {
        self.json()["id"].clone()
    }
}

/// Start a programmable mock server on an ephemeral port.
///
/// The handler sees every request and returns `(status, body)`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        serve_one(socket, f).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn serve_one<F, Fut>(mut socket: TcpStream, f: Arc<F>)
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let Some(request) = read_request(&mut socket).await else {
        return;
    };
    let (status, body) = f(request).await;
    let status_text = match status {
        200 => "200 OK",
        401 => "401 Unauthorized",
        403 => "403 Forbidden",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    };

    let response_str = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    );
    let _ = socket.write_all(response_str.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_request(socket: &mut TcpStream) -> Option<MockRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = (header_end + content_length).min(buf.len());
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    Some(MockRequest {
        method,
        path,
        headers,
        body,
    })
}

/// JSON-RPC success body echoing the request id.
pub fn rpc_result(request: &MockRequest, result: Value) -> (u16, String) {
    let body = serde_json::json!({ "jsonrpc": "2.0", "id": request.rpc_id(), "result": result });
    (200, body.to_string())
}

/// JSON-RPC error body echoing the request id.
pub fn rpc_error(request: &MockRequest, code: i64, message: &str) -> (u16, String) {
    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "id": request.rpc_id(),
        "error": { "code": code, "message": message },
    });
    (200, body.to_string())
}

pub fn http_url(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}
