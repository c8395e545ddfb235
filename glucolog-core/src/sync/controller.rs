//! Reconciles the local [`LogStore`] with the server's log list.
//!
//! Every mutation follows the same rule: the store only changes after the
//! server has confirmed the operation. A fetch replaces the store wholesale,
//! a create prepends the record the server returned, a delete removes the id
//! once the server has answered 2xx. Failures leave the store exactly as it
//! was.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::error::SyncError;
use super::state::{FetchOrdering, SyncPhase};
use crate::api::GlucoseApi;
use crate::models::{GlucoseLog, NewGlucoseLog, ReadingContext};
use crate::session::{auth_token, KeyValueStore, AUTH_TOKEN_KEY};
use crate::store::LogStore;

/// A reading as entered, before it has been sent anywhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogDraft {
    /// Numeric text, e.g. `"168"`.
    pub value: String,
    pub context: Option<ReadingContext>,
    /// Defaults to the moment of submission.
    pub taken_at: Option<DateTime<Utc>>,
}

impl LogDraft {
    pub fn new(value: impl Into<String>, context: ReadingContext) -> Self {
        Self {
            value: value.into(),
            context: Some(context),
            taken_at: None,
        }
    }

    pub fn taken_at(mut self, taken_at: DateTime<Utc>) -> Self {
        self.taken_at = Some(taken_at);
        self
    }

    /// Value and context are both present.
    pub fn is_complete(&self) -> bool {
        !self.value.trim().is_empty() && self.context.is_some()
    }
}

/// Result of a fetch that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The store now holds this many logs from the server.
    Applied(usize),
    /// No bearer token; nothing was requested.
    NotAuthenticated,
    /// A newer fetch was issued while this one was in flight, and ordering
    /// is [`FetchOrdering::LatestRequest`]. The response was discarded.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// The server assigned an id and the record is now first in the store.
    Applied(GlucoseLog),
    /// The server accepted the write but its response had no usable id,
    /// so nothing was added locally.
    Dropped,
    /// Value or context missing; nothing was sent.
    Incomplete,
    /// No bearer token; nothing was sent.
    NotAuthenticated,
}

impl CreateOutcome {
    /// The server accepted the write (whether or not it was applied locally).
    pub fn is_saved(&self) -> bool {
        matches!(self, CreateOutcome::Applied(_) | CreateOutcome::Dropped)
    }
}

/// The user's answer to the delete prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The server deleted the log; `removed` local entries were dropped.
    Deleted { removed: usize },
    Cancelled,
    NotAuthenticated,
}

/// Fetch/create/delete orchestration for one list screen.
pub struct LogSync<A, S> {
    api: A,
    session: S,
    store: LogStore,
    phase: watch::Sender<SyncPhase>,
    /// Set once a fetch has completed; later focus events refresh instead
    /// of loading.
    shown: AtomicBool,
    issued: AtomicU64,
    ordering: FetchOrdering,
}

impl<A: GlucoseApi, S: KeyValueStore> LogSync<A, S> {
    pub fn new(api: A, session: S, store: LogStore) -> Self {
        let (phase, _) = watch::channel(SyncPhase::Idle);
        Self {
            api,
            session,
            store,
            phase,
            shown: AtomicBool::new(false),
            issued: AtomicU64::new(0),
            ordering: FetchOrdering::default(),
        }
    }

    pub fn with_ordering(mut self, ordering: FetchOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn ordering(&self) -> FetchOrdering {
        self.ordering
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase.borrow().clone()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<SyncPhase> {
        self.phase.subscribe()
    }

    /// Screen became visible (including first mount). Loads on the first
    /// call, refreshes afterwards. There is no freshness check: every call
    /// is a round trip.
    pub async fn focus(&self) -> Result<FetchOutcome, SyncError> {
        let pending = if self.shown.load(Ordering::SeqCst) {
            SyncPhase::Refreshing
        } else {
            SyncPhase::Loading
        };
        self.fetch(pending).await
    }

    /// Pull-to-refresh.
    pub async fn refresh(&self) -> Result<FetchOutcome, SyncError> {
        self.fetch(SyncPhase::Refreshing).await
    }

    async fn fetch(&self, pending: SyncPhase) -> Result<FetchOutcome, SyncError> {
        self.phase.send_replace(pending);

        let token = match auth_token(&self.session) {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!("No auth token, skipping fetch");
                self.shown.store(true, Ordering::SeqCst);
                self.phase.send_replace(SyncPhase::Idle);
                return Ok(FetchOutcome::NotAuthenticated);
            }
            Err(e) => {
                self.phase.send_replace(SyncPhase::Error(e.to_string()));
                return Err(e.into());
            }
        };

        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.list_logs(&token).await;
        // Any completed fetch ends the initial load, successful or not.
        self.shown.store(true, Ordering::SeqCst);

        if self.ordering == FetchOrdering::LatestRequest && seq != self.issued.load(Ordering::SeqCst)
        {
            tracing::debug!("Discarding response of superseded fetch #{}", seq);
            return Ok(FetchOutcome::Superseded);
        }

        match result {
            Ok(logs) => {
                let count = logs.len();
                self.store.replace_all(logs);
                self.phase.send_replace(SyncPhase::Idle);
                Ok(FetchOutcome::Applied(count))
            }
            Err(e) => {
                tracing::warn!("Failed to fetch logs: {}", e);
                self.phase.send_replace(SyncPhase::Error(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Sends a new reading and, once the server returns it with an id,
    /// puts it at the head of the store.
    pub async fn create(&self, draft: &LogDraft) -> Result<CreateOutcome, SyncError> {
        let Some(context) = draft.context else {
            return Ok(CreateOutcome::Incomplete);
        };
        let raw = draft.value.trim();
        if raw.is_empty() {
            return Ok(CreateOutcome::Incomplete);
        }
        let value: i32 = raw
            .parse()
            .map_err(|_| SyncError::InvalidValue(raw.to_string()))?;

        let Some(token) = auth_token(&self.session)? else {
            tracing::debug!("No auth token, skipping create");
            return Ok(CreateOutcome::NotAuthenticated);
        };

        let body = NewGlucoseLog::new(value, context, draft.taken_at.unwrap_or_else(Utc::now));
        let response = self.api.create_log(&token, &body).await?;

        match GlucoseLog::from_created(response) {
            Ok(log) => {
                self.store.prepend(log.clone());
                Ok(CreateOutcome::Applied(log))
            }
            Err(e) => {
                tracing::warn!("Create succeeded but response was not applied: {:?}", e);
                Ok(CreateOutcome::Dropped)
            }
        }
    }

    /// Deletes a log remotely, then locally. Nothing happens without
    /// [`Confirmation::Confirm`].
    pub async fn delete(
        &self,
        id: &str,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, SyncError> {
        if confirmation == Confirmation::Cancel {
            return Ok(DeleteOutcome::Cancelled);
        }

        let Some(token) = auth_token(&self.session)? else {
            tracing::debug!("No auth token, skipping delete");
            return Ok(DeleteOutcome::NotAuthenticated);
        };

        self.api.delete_log(&token, id).await?;
        let removed = self.store.remove_by_id(id);
        Ok(DeleteOutcome::Deleted { removed })
    }

    /// Logout: forgets the token and discards the session's logs.
    pub fn end_session(&self) -> Result<(), SyncError> {
        self.session.remove(AUTH_TOKEN_KEY)?;
        self.store.clear();
        self.shown.store(false, Ordering::SeqCst);
        self.phase.send_replace(SyncPhase::Idle);
        Ok(())
    }
}
