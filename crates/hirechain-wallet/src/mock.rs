//! Mock wallet connector for testing.

use crate::connector::{ConnectorLoader, SignRequest, TxResult, WalletConfig, WalletConnector};
use crate::error::{Result, WalletError};
use async_trait::async_trait;
use hirechain_client::AccountId;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Mock connector for testing.
///
/// Scriptable pairing and signing outcomes, with call counts so tests can
/// assert that a failed phase short-circuits the rest of a flow.
pub struct MockConnector {
    restored: Option<AccountId>,
    modal_account: Option<AccountId>,
    /// When set, `open_modal` blocks until the gate is notified
    modal_gate: Option<Arc<Notify>>,
    /// When set, `sign_and_execute` blocks until the gate is notified
    sign_gate: Option<Arc<Notify>>,
    sign_failure: Mutex<Option<String>>,
    /// Number of sign calls that succeed before `sign_failure` applies
    fail_after_signs: u32,
    active: Mutex<Option<AccountId>>,
    init_calls: AtomicU32,
    modal_calls: AtomicU32,
    sign_calls: AtomicU32,
    disconnect_calls: AtomicU32,
    signed_payloads: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self {
            restored: None,
            modal_account: Some(AccountId::from("0.0.1001")),
            modal_gate: None,
            sign_gate: None,
            sign_failure: Mutex::new(None),
            fail_after_signs: 0,
            active: Mutex::new(None),
            init_calls: AtomicU32::new(0),
            modal_calls: AtomicU32::new(0),
            sign_calls: AtomicU32::new(0),
            disconnect_calls: AtomicU32::new(0),
            signed_payloads: Mutex::new(Vec::new()),
        }
    }

    /// Pretend a previous pairing is persisted and restorable.
    pub fn with_restored_signer(mut self, account: impl Into<AccountId>) -> Self {
        self.restored = Some(account.into());
        self
    }

    /// Account returned when the user pairs through the modal.
    pub fn with_modal_signer(mut self, account: impl Into<AccountId>) -> Self {
        self.modal_account = Some(account.into());
        self
    }

    /// Pairing resolves but yields no usable signer.
    pub fn with_no_modal_signer(mut self) -> Self {
        self.modal_account = None;
        self
    }

    /// Block `open_modal` until the gate is notified, to exercise
    /// concurrent-connect guards.
    pub fn with_modal_gate(mut self, gate: Arc<Notify>) -> Self {
        self.modal_gate = Some(gate);
        self
    }

    /// Block `sign_and_execute` until the gate is notified, to exercise
    /// in-flight flow guards.
    pub fn with_sign_gate(mut self, gate: Arc<Notify>) -> Self {
        self.sign_gate = Some(gate);
        self
    }

    /// Every sign call fails with the given message.
    pub fn with_sign_failure(self, message: impl Into<String>) -> Self {
        *self.sign_failure.lock().unwrap_or_else(|p| p.into_inner()) = Some(message.into());
        self
    }

    /// The first `n` sign calls succeed, later ones fail with `message`.
    pub fn failing_after_signs(mut self, n: u32, message: impl Into<String>) -> Self {
        self.fail_after_signs = n;
        *self.sign_failure.lock().unwrap_or_else(|p| p.into_inner()) = Some(message.into());
        self
    }

    pub fn init_count(&self) -> u32 {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn modal_count(&self) -> u32 {
        self.modal_calls.load(Ordering::SeqCst)
    }

    pub fn sign_count(&self) -> u32 {
        self.sign_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_count(&self) -> u32 {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    /// Payloads signed so far, in submission order.
    pub fn signed_payloads(&self) -> Vec<String> {
        self.signed_payloads
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    fn set_active(&self, account: Option<AccountId>) {
        *self.active.lock().unwrap_or_else(|p| p.into_inner()) = account;
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletConnector for MockConnector {
    async fn init(&self) -> Result<Option<AccountId>> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(account) = &self.restored {
            self.set_active(Some(account.clone()));
        }
        Ok(self.restored.clone())
    }

    async fn open_modal(&self) -> Result<AccountId> {
        self.modal_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.modal_gate {
            gate.notified().await;
        }

        match &self.modal_account {
            Some(account) => {
                self.set_active(Some(account.clone()));
                Ok(account.clone())
            }
            None => Err(WalletError::NoSigner),
        }
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        self.set_active(None);
        Ok(())
    }

    async fn sign_and_execute(&self, request: SignRequest) -> Result<TxResult> {
        let call = self.sign_calls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(gate) = &self.sign_gate {
            gate.notified().await;
        }

        let failure = self
            .sign_failure
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(message) = failure {
            if call > self.fail_after_signs {
                return Err(WalletError::Rejected(message));
            }
        }

        self.signed_payloads
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(request.transaction_list);

        Ok(TxResult {
            transaction_id: format!("{}@mock-{}", request.signer_account_id, call),
        })
    }

    fn active_signer(&self) -> Option<AccountId> {
        self.active
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

/// Loader that hands out a pre-built connector, for tests and embedders
/// that construct the SDK themselves.
pub struct StaticLoader {
    connector: Arc<dyn WalletConnector>,
}

impl StaticLoader {
    pub fn new(connector: Arc<dyn WalletConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl ConnectorLoader for StaticLoader {
    async fn load(&self, _config: &WalletConfig) -> Result<Arc<dyn WalletConnector>> {
        Ok(self.connector.clone())
    }
}
