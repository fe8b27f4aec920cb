//! End-to-end session and submission flows over scripted wallet backends.

use alloy::primitives::{keccak256, Address, Bytes, U256};
use alloy::sol_types::SolValue;
use std::sync::Arc;

use frodo_wallet::contracts::{CircleSavings, MicroLending};
use frodo_wallet::{
    Error, PendingTransaction, ProviderMultiplexer, SessionInfo, SessionStore,
    TransactionSubmitter, WalletKind,
};

mod common;
use common::{ConnectOutcome, MockBackend};

fn store_with(backends: &[Arc<MockBackend>]) -> Arc<SessionStore> {
    let mux = backends
        .iter()
        .fold(ProviderMultiplexer::new(), |mux, b| mux.with_backend(b.clone()));
    Arc::new(SessionStore::new(mux))
}

fn circle() -> CircleSavings {
    CircleSavings::at(Address::repeat_byte(0xc1))
}

#[tokio::test]
async fn test_unregistered_kind_is_unsupported() {
    let embedded = MockBackend::new(WalletKind::Embedded, 0xaa);
    let store = store_with(&[embedded.clone()]);

    let err = store.login(WalletKind::Custodial).await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedKind(WalletKind::Custodial)));
    assert_eq!(store.info(), SessionInfo::default());

    // Same from a logged-in state: nothing changes.
    store.login(WalletKind::Embedded).await.unwrap();
    let before = store.info();
    let err = store.login(WalletKind::Custodial).await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedKind(_)));
    assert_eq!(store.info(), before);
    assert_eq!(embedded.calls.disconnects(), 0);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let embedded = MockBackend::new(WalletKind::Embedded, 0xaa);
    let store = store_with(&[embedded.clone()]);

    store.logout().await;
    assert_eq!(embedded.calls.total(), 0);

    store.login(WalletKind::Embedded).await.unwrap();
    store.logout().await;
    store.logout().await;
    assert_eq!(embedded.calls.disconnects(), 1);
    assert!(!store.is_authenticated());
    assert!(store.address().is_none());
    assert!(store.wallet_kind().is_none());
}

#[tokio::test]
async fn test_submit_without_login_touches_no_backend() {
    let embedded = MockBackend::new(WalletKind::Embedded, 0xaa);
    let store = store_with(&[embedded.clone()]);
    let submitter = TransactionSubmitter::new(store);

    let err = submitter.submit_call(circle().contribute()).await.unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated));

    let err = submitter
        .get_data(Address::repeat_byte(0x01), None, Bytes::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated));

    let err = submitter.get_balance().await.unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated));

    assert_eq!(embedded.calls.total(), 0);
}

/// Scenario A: log in, contribute, get a receipt, session unchanged.
#[tokio::test]
async fn test_login_then_contribute() {
    let embedded = MockBackend::new(WalletKind::Embedded, 0xaa);
    let store = store_with(&[embedded.clone()]);
    let submitter = TransactionSubmitter::new(store.clone());

    let info = store.login(WalletKind::Embedded).await.unwrap();
    assert!(info.is_authenticated);
    assert_eq!(info.wallet_kind, Some(WalletKind::Embedded));
    assert_eq!(info.address, Some(embedded.address()));

    let receipt = submitter.submit_call(circle().contribute()).await.unwrap();
    assert!(receipt.success);
    assert_eq!(receipt.to, Some(circle().address()));

    let sent = embedded.calls.last_sent().unwrap();
    assert_eq!(sent.to, circle().address());
    assert_eq!(sent.data.unwrap().as_ref(), &keccak256("contribute()")[..4]);
    assert!(sent.value.is_none());

    assert_eq!(store.info(), info);
    assert_eq!(embedded.calls.sends(), 1);
}

/// Scenario B: submission with no session.
#[tokio::test]
async fn test_contribute_without_login() {
    let store = Arc::new(SessionStore::new(ProviderMultiplexer::new()));
    let submitter = TransactionSubmitter::new(store);
    let err = submitter.submit_call(circle().contribute()).await.unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated));
}

/// Scenario C: switching wallets disconnects the first exactly once.
#[tokio::test]
async fn test_switch_wallet_kind() {
    let embedded = MockBackend::new(WalletKind::Embedded, 0xaa);
    let injected = MockBackend::new(WalletKind::Injected, 0xbb);
    let store = store_with(&[embedded.clone(), injected.clone()]);

    store.login(WalletKind::Embedded).await.unwrap();
    let info = store.login(WalletKind::Injected).await.unwrap();

    assert_eq!(info.wallet_kind, Some(WalletKind::Injected));
    assert_eq!(store.address(), Some(injected.address()));
    assert_eq!(embedded.calls.disconnects(), 1);
    assert_eq!(injected.calls.disconnects(), 0);

    // Submissions now go through the new handle only.
    let submitter = TransactionSubmitter::new(store);
    submitter.submit_call(circle().withdraw()).await.unwrap();
    assert_eq!(embedded.calls.sends(), 0);
    assert_eq!(injected.calls.sends(), 1);
}

/// Scenario D: the user dismisses the wallet prompt.
#[tokio::test]
async fn test_user_rejects_login() {
    let custodial = MockBackend::with_outcome(WalletKind::Custodial, 0xcc, ConnectOutcome::Reject);
    let store = store_with(&[custodial]);

    let err = store.login(WalletKind::Custodial).await.unwrap_err();
    assert!(matches!(err, Error::LoginFailed { kind: WalletKind::Custodial, .. }));
    assert!(err.is_user_rejected());
    assert!(!store.is_authenticated());
    assert!(store.info().address_hex().is_none());
}

#[tokio::test]
async fn test_failed_switch_keeps_previous_session() {
    let embedded = MockBackend::new(WalletKind::Embedded, 0xaa);
    let injected =
        MockBackend::with_outcome(WalletKind::Injected, 0xbb, ConnectOutcome::Unavailable);
    let store = store_with(&[embedded.clone(), injected.clone()]);

    let before = store.login(WalletKind::Embedded).await.unwrap();
    let err = store.login(WalletKind::Injected).await.unwrap_err();
    assert!(matches!(err, Error::LoginFailed { .. }));
    assert!(!err.is_user_rejected());

    assert_eq!(store.info(), before);
    assert_eq!(embedded.calls.disconnects(), 0);

    // The wallet comes back; the retry switches over.
    injected.set_outcome(ConnectOutcome::Succeed);
    store.login(WalletKind::Injected).await.unwrap();
    assert_eq!(store.wallet_kind(), Some(WalletKind::Injected));
    assert_eq!(embedded.calls.disconnects(), 1);
}

#[tokio::test]
async fn test_reverted_receipt_is_an_error() {
    let embedded = MockBackend::reverting(WalletKind::Embedded, 0xaa);
    let store = store_with(&[embedded.clone()]);
    store.login(WalletKind::Embedded).await.unwrap();

    let submitter = TransactionSubmitter::new(store.clone());
    let err = submitter
        .submit_call(MicroLending::at(Address::repeat_byte(0x1e)).contribute())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Reverted { .. }));
    // A failed submission does not touch the session.
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn test_pending_transaction_carries_value_and_gas() {
    let embedded = MockBackend::new(WalletKind::Embedded, 0xaa);
    let store = store_with(&[embedded.clone()]);
    store.login(WalletKind::Embedded).await.unwrap();

    let tx = PendingTransaction::new(Address::repeat_byte(0x05), Bytes::new())
        .with_value(U256::from(42u64))
        .with_gas_limit(50_000)
        .with_gas_price(2_000_000_000);
    TransactionSubmitter::new(store).submit(tx).await.unwrap();

    let sent = embedded.calls.last_sent().unwrap();
    assert_eq!(sent.value, Some(U256::from(42u64)));
    assert_eq!(sent.gas_limit, Some(50_000));
    assert_eq!(sent.gas_price, Some(2_000_000_000));
    assert!(sent.data.is_none());
}

#[tokio::test]
async fn test_read_decodes_view_result() {
    let raw = Bytes::from(U256::from(7u64).abi_encode());
    let embedded = MockBackend::answering(WalletKind::Embedded, 0xaa, raw);
    let store = store_with(&[embedded.clone()]);
    store.login(WalletKind::Embedded).await.unwrap();

    let submitter = TransactionSubmitter::new(store);
    let count = submitter.read(&circle().get_member_count()).await.unwrap();
    assert_eq!(count, U256::from(7u64));
    assert_eq!(embedded.calls.calls(), 1);

    let balance = submitter.get_balance_ether().await.unwrap();
    assert!(balance.starts_with("1.5"));
}

#[tokio::test]
async fn test_concurrent_logins_leave_one_session() {
    let embedded = MockBackend::new(WalletKind::Embedded, 0xaa);
    let injected = MockBackend::new(WalletKind::Injected, 0xbb);
    let store = store_with(&[embedded.clone(), injected.clone()]);

    let (a, b) = tokio::join!(
        store.login(WalletKind::Embedded),
        store.login(WalletKind::Injected)
    );
    a.unwrap();
    b.unwrap();

    // Whichever ran second won; the first was disconnected exactly once.
    let winner = store.wallet_kind().unwrap();
    let (won, lost) = match winner {
        WalletKind::Embedded => (&embedded, &injected),
        _ => (&injected, &embedded),
    };
    assert_eq!(store.address(), Some(won.address()));
    assert_eq!(lost.calls.disconnects(), 1);
    assert_eq!(won.calls.disconnects(), 0);
}

#[tokio::test]
async fn test_subscribers_follow_transitions() {
    let embedded = MockBackend::new(WalletKind::Embedded, 0xaa);
    let store = store_with(&[embedded]);
    let mut updates = store.subscribe();

    store.login(WalletKind::Embedded).await.unwrap();
    updates.changed().await.unwrap();
    assert!(updates.borrow_and_update().is_authenticated);

    store.logout().await;
    updates.changed().await.unwrap();
    assert_eq!(*updates.borrow_and_update(), SessionInfo::default());
}
