//! Per-gig message thread with fixed-interval polling
//!
//! The backend is the only authority on message order: after a successful
//! send the thread refetches the list instead of appending locally, at the
//! cost of one extra round trip per send.

use crate::error::Result;
use hirechain_client::{AccountId, ApiClient, GigMessage, NewMessage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Fixed refetch cadence while a thread view is open.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// One gig's message thread.
///
/// `start` fetches immediately and then refetches every
/// [`POLL_INTERVAL`] until `stop` (or drop) tears the poller down.
pub struct MessageThread {
    api: ApiClient,
    gig_ref_id: String,
    sender: AccountId,
    messages: Arc<RwLock<Vec<GigMessage>>>,
    draft: Mutex<String>,
    sending: AtomicBool,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl MessageThread {
    pub fn new(api: ApiClient, gig_ref_id: impl Into<String>, sender: AccountId) -> Self {
        Self {
            api,
            gig_ref_id: gig_ref_id.into(),
            sender,
            messages: Arc::new(RwLock::new(Vec::new())),
            draft: Mutex::new(String::new()),
            sending: AtomicBool::new(false),
            poll_task: Mutex::new(None),
        }
    }

    /// The messages as last fetched, in the backend's order.
    pub fn messages(&self) -> Vec<GigMessage> {
        self.messages
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn draft(&self) -> String {
        self.draft.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        *self.draft.lock().unwrap_or_else(|p| p.into_inner()) = text.into();
    }

    /// Fetch the thread once. Failures keep the previous list.
    pub async fn refresh(&self) {
        fetch_into(&self.api, &self.gig_ref_id, &self.messages).await;
    }

    /// Begin polling. Idempotent; a running poller is left alone.
    pub fn start(&self) {
        let mut task = self.poll_task.lock().unwrap_or_else(|p| p.into_inner());
        if task.is_some() {
            return;
        }

        let api = self.api.clone();
        let gig_ref_id = self.gig_ref_id.clone();
        let messages = self.messages.clone();

        *task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(POLL_INTERVAL);
            loop {
                interval.tick().await;
                fetch_into(&api, &gig_ref_id, &messages).await;
            }
        }));
    }

    /// Stop polling. In-flight requests are abandoned.
    pub fn stop(&self) {
        if let Some(task) = self
            .poll_task
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take()
        {
            task.abort();
        }
    }

    /// Send the current draft.
    ///
    /// A draft whose trimmed content is empty is not sent (`Ok(false)`),
    /// as is a send while another is in flight. The draft is cleared
    /// immediately; on failure the exact original content is restored.
    pub async fn send(&self) -> Result<bool> {
        if self.sending.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }

        let original = self.draft();
        let content = original.trim().to_string();
        if content.is_empty() {
            self.sending.store(false, Ordering::SeqCst);
            return Ok(false);
        }

        self.set_draft("");

        let result = self
            .api
            .send_gig_message(
                &self.gig_ref_id,
                &NewMessage {
                    sender_id: self.sender.clone(),
                    message: content,
                },
            )
            .await;

        let outcome = match result {
            Ok(_) => {
                self.refresh().await;
                Ok(true)
            }
            Err(err) => {
                self.set_draft(original);
                Err(err.into())
            }
        };

        self.sending.store(false, Ordering::SeqCst);
        outcome
    }

    /// Whether the given sender is the local user, for bubble alignment.
    pub fn is_own_message(&self, message: &GigMessage) -> bool {
        message.sender_id == self.sender
    }
}

impl Drop for MessageThread {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn fetch_into(api: &ApiClient, gig_ref_id: &str, messages: &Arc<RwLock<Vec<GigMessage>>>) {
    match api.gig_messages(gig_ref_id).await {
        Ok(list) => {
            *messages.write().unwrap_or_else(|p| p.into_inner()) = list;
        }
        Err(err) => tracing::debug!("Error fetching messages for {}: {}", gig_ref_id, err),
    }
}
