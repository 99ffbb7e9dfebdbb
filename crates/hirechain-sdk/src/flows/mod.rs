//! Signed transaction flows
//!
//! Every money-moving operation follows the same sequential pipeline:
//! the backend stages one or more unsigned transactions (**prepare**), the
//! wallet signs and submits them in order (**sign**), and a second backend
//! call commits the effect (**record**). Signing is strictly sequential —
//! a later transaction may be causally dependent on an earlier one — and a
//! signing failure skips the record call entirely, so nothing is recorded
//! that was never submitted. A record failure after submission is
//! journaled for [`Flows::resync`].

mod journal;

pub use journal::{PendingKind, PendingRecord, PendingRecordJournal};

use crate::error::{Result, SdkError};
use crate::session::AuthStore;
use crate::store::SessionStore;
use hirechain_client::{
    AccountId, ApiClient, ApiError, Gig, GigStatus, NewGig, NewProfile, RecordAssignment,
    UserProfileData,
};
use hirechain_wallet::{WalletError, WalletSession};
use std::sync::Arc;
use tokio::sync::Mutex;

const MAX_SKILLS: usize = 15;

/// Result of replaying the pending-record journal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResyncReport {
    pub replayed: usize,
    pub remaining: usize,
}

/// The prepare → sign → record orchestration flows.
///
/// Each flow holds its own in-flight guard; a second invocation while one
/// is running gets [`SdkError::Busy`] instead of racing it.
pub struct Flows {
    api: ApiClient,
    wallet: Arc<WalletSession>,
    auth: Arc<AuthStore>,
    journal: PendingRecordJournal,
    profile_guard: Mutex<()>,
    gig_guard: Mutex<()>,
    assignment_guard: Mutex<()>,
    escrow_guard: Mutex<()>,
}

impl Flows {
    pub fn new(
        api: ApiClient,
        wallet: Arc<WalletSession>,
        auth: Arc<AuthStore>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            api,
            wallet,
            auth,
            journal: PendingRecordJournal::new(store),
            profile_guard: Mutex::new(()),
            gig_guard: Mutex::new(()),
            assignment_guard: Mutex::new(()),
            escrow_guard: Mutex::new(()),
        }
    }

    /// Register a profile for the connected account, then load the full
    /// aggregate so the caller can route straight to the dashboard.
    pub async fn create_profile(&self, input: NewProfile) -> Result<UserProfileData> {
        let _guard = self
            .profile_guard
            .try_lock()
            .map_err(|_| SdkError::Busy("Profile creation"))?;

        validate_new_profile(&input)?;

        let prepared = self.api.prepare_profile_creation(&input).await?;
        self.wallet
            .sign_and_execute_tx(&prepared.encoded_transaction)
            .await?;

        if let Err(err) = self.api.record_profile_creation(&prepared.profile_data).await {
            self.journal_failure(PendingRecord::new(
                PendingKind::ProfileCreation,
                None,
                prepared.profile_data,
            ));
            return Err(SdkError::RecordFailed(err.to_string()));
        }

        let data = self.api.get_freelancer(&input.account_id).await?;
        self.auth.install_full_user_data(data.clone());
        Ok(data)
    }

    /// Post a new gig.
    pub async fn create_gig(&self, input: NewGig) -> Result<()> {
        let _guard = self
            .gig_guard
            .try_lock()
            .map_err(|_| SdkError::Busy("Gig creation"))?;

        if input.title.trim().is_empty() || input.description.trim().is_empty() {
            return Err(SdkError::Validation(
                "Gig title and description are required".to_string(),
            ));
        }

        let prepared = self.api.prepare_gig_creation(&input).await?;
        self.wallet
            .sign_and_execute_tx(&prepared.encoded_transaction)
            .await?;

        if let Err(err) = self.api.record_gig_creation(&prepared.gig_data).await {
            self.journal_failure(PendingRecord::new(
                PendingKind::GigCreation,
                None,
                prepared.gig_data,
            ));
            return Err(SdkError::RecordFailed(err.to_string()));
        }

        Ok(())
    }

    /// Assign a freelancer to one of the caller's open gigs.
    ///
    /// Two transactions are staged: the escrow contract transaction and
    /// the consensus log transaction. The second is only signed after the
    /// first has resolved.
    pub async fn assign_freelancer(
        &self,
        gig_ref_id: &str,
        freelancer_id: &AccountId,
    ) -> Result<()> {
        let _guard = self
            .assignment_guard
            .try_lock()
            .map_err(|_| SdkError::Busy("Freelancer assignment"))?;

        let client_id = self.require_account()?;

        let prepared = self
            .api
            .prepare_assignment(gig_ref_id, &client_id, freelancer_id)
            .await?;

        let contract_tx = self
            .wallet
            .sign_and_execute_tx(&prepared.encoded_contract_tx)
            .await?;
        self.wallet
            .sign_and_execute_tx(&prepared.encoded_hcs_tx)
            .await?;

        let record = RecordAssignment {
            contract_transaction_id: contract_tx.transaction_id,
            freelancer_account_id: freelancer_id.clone(),
            update_gig_data: prepared.update_gig_data,
        };

        if let Err(err) = self.api.record_assignment(gig_ref_id, &record).await {
            self.journal_failure(PendingRecord::new(
                PendingKind::Assignment,
                Some(gig_ref_id.to_string()),
                serde_json::to_value(&record)?,
            ));
            return Err(SdkError::RecordFailed(err.to_string()));
        }

        Ok(())
    }

    /// Lock and release the escrow for a gig, paying the freelancer.
    ///
    /// Only offered while the gig is in progress or completed; the backend
    /// finalizes the gig when the release is recorded.
    pub async fn release_payment(&self, gig: &Gig) -> Result<()> {
        let _guard = self
            .escrow_guard
            .try_lock()
            .map_err(|_| SdkError::Busy("Payment release"))?;

        if !matches!(gig.status, GigStatus::InProgress | GigStatus::Completed) {
            return Err(SdkError::Validation(format!(
                "Payment cannot be released while the gig is {}",
                gig.status.as_str()
            )));
        }

        let amount = gig.budget_amount().ok_or_else(|| {
            SdkError::Validation(format!("Gig budget is not a payable amount: {}", gig.budget))
        })?;
        let client_id = self.require_account()?;

        let lock = self
            .api
            .prepare_lock_escrow(&gig.gig_ref_id, amount, &client_id)
            .await?;
        self.wallet
            .sign_and_execute_tx(&lock.encoded_transaction)
            .await?;

        let release = self
            .api
            .prepare_release_escrow(&gig.gig_ref_id, &client_id)
            .await?;
        self.wallet
            .sign_and_execute_tx(&release.encoded_transaction)
            .await?;

        if let Err(err) = self.api.record_release_escrow(&gig.gig_ref_id).await {
            self.journal_failure(PendingRecord::new(
                PendingKind::EscrowRelease,
                Some(gig.gig_ref_id.clone()),
                serde_json::Value::Null,
            ));
            return Err(SdkError::RecordFailed(err.to_string()));
        }

        Ok(())
    }

    /// Replay journaled record calls. Entries that succeed are dropped;
    /// entries that fail again stay journaled for the next attempt.
    pub async fn resync(&self) -> Result<ResyncReport> {
        let entries = self.journal.entries();
        if entries.is_empty() {
            return Ok(ResyncReport::default());
        }

        let mut replayed = 0;
        let mut remaining = Vec::new();

        for entry in entries {
            match self.replay(&entry).await {
                Some(Ok(())) => replayed += 1,
                Some(Err(err)) => {
                    tracing::warn!("Pending record still failing: {}", err);
                    remaining.push(entry);
                }
                // Malformed entry; nothing sensible to replay
                None => tracing::warn!("Dropping malformed pending record"),
            }
        }

        self.journal.replace(&remaining)?;
        Ok(ResyncReport {
            replayed,
            remaining: remaining.len(),
        })
    }

    /// Whether any signed-but-unrecorded operations are waiting.
    pub fn has_pending_records(&self) -> bool {
        !self.journal.is_empty()
    }

    async fn replay(&self, entry: &PendingRecord) -> Option<std::result::Result<(), ApiError>> {
        let result = match entry.kind {
            PendingKind::ProfileCreation => self
                .api
                .record_profile_creation(&entry.payload)
                .await
                .map(|_| ()),
            PendingKind::GigCreation => {
                self.api.record_gig_creation(&entry.payload).await.map(|_| ())
            }
            PendingKind::Assignment => {
                let gig_ref_id = entry.gig_ref_id.as_deref()?;
                let record: RecordAssignment =
                    serde_json::from_value(entry.payload.clone()).ok()?;
                self.api
                    .record_assignment(gig_ref_id, &record)
                    .await
                    .map(|_| ())
            }
            PendingKind::EscrowRelease => {
                let gig_ref_id = entry.gig_ref_id.as_deref()?;
                self.api.record_release_escrow(gig_ref_id).await.map(|_| ())
            }
        };
        Some(result)
    }

    fn require_account(&self) -> Result<AccountId> {
        self.auth
            .account_id()
            .ok_or(SdkError::Wallet(WalletError::NotConnected))
    }

    fn journal_failure(&self, record: PendingRecord) {
        if let Err(err) = self.journal.push(record) {
            tracing::error!("Failed to journal pending record: {}", err);
        }
    }
}

fn validate_new_profile(input: &NewProfile) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(SdkError::Validation("Name is required".to_string()));
    }
    if input.email.trim().is_empty() || !input.email.contains('@') {
        return Err(SdkError::Validation("A valid email is required".to_string()));
    }
    if input.skills.len() > MAX_SKILLS {
        return Err(SdkError::Validation(format!(
            "At most {} skills are allowed",
            MAX_SKILLS
        )));
    }
    Ok(())
}
