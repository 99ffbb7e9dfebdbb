//! Pending-record journal
//!
//! A flow that signed and submitted a transaction but failed the backend
//! record call leaves the ledger and the backend diverged. The failed
//! record call is journaled here so `resync` can replay it later; the
//! backend stays authoritative and simply re-validates the transition.

use crate::error::Result;
use crate::store::{SessionStore, PENDING_RECORDS_KEY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which record endpoint the entry replays against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PendingKind {
    ProfileCreation,
    GigCreation,
    Assignment,
    EscrowRelease,
}

/// One record call that failed after its transactions were submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRecord {
    pub kind: PendingKind,
    #[serde(default)]
    pub gig_ref_id: Option<String>,
    /// The record body, exactly as it would have been sent
    pub payload: serde_json::Value,
    pub failed_at: DateTime<Utc>,
}

impl PendingRecord {
    pub fn new(kind: PendingKind, gig_ref_id: Option<String>, payload: serde_json::Value) -> Self {
        Self {
            kind,
            gig_ref_id,
            payload,
            failed_at: Utc::now(),
        }
    }
}

/// Persistent queue of failed record calls.
pub struct PendingRecordJournal {
    store: Arc<dyn SessionStore>,
}

impl PendingRecordJournal {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// All journaled entries, oldest first.
    pub fn entries(&self) -> Vec<PendingRecord> {
        let Some(raw) = self.store.load(PENDING_RECORDS_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!("Ignoring unreadable pending-record journal: {}", err);
                Vec::new()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Append an entry.
    pub fn push(&self, record: PendingRecord) -> Result<()> {
        let mut entries = self.entries();
        entries.push(record);
        self.write(&entries)
    }

    /// Replace the journal with the entries that are still pending.
    pub fn replace(&self, entries: &[PendingRecord]) -> Result<()> {
        if entries.is_empty() {
            self.store.remove(PENDING_RECORDS_KEY);
            Ok(())
        } else {
            self.write(entries)
        }
    }

    fn write(&self, entries: &[PendingRecord]) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        self.store.save(PENDING_RECORDS_KEY, &raw)
    }
}
