//! State behind the "add reading" form.

use chrono::{DateTime, Utc};

use super::controller::{CreateOutcome, LogDraft, LogSync};
use super::error::SyncError;
use crate::api::GlucoseApi;
use crate::models::ReadingContext;
use crate::session::KeyValueStore;

/// Value the form starts with and returns to after a save.
pub const DEFAULT_VALUE: &str = "168";

type SavedCallback = Box<dyn FnMut() + Send>;

pub struct LogForm {
    pub value: String,
    pub context: Option<ReadingContext>,
    pub taken_at: DateTime<Utc>,
    on_saved: Option<SavedCallback>,
}

impl Default for LogForm {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LogForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogForm")
            .field("value", &self.value)
            .field("context", &self.context)
            .field("taken_at", &self.taken_at)
            .field("on_saved", &self.on_saved.is_some())
            .finish()
    }
}

impl LogForm {
    pub fn new() -> Self {
        Self {
            value: DEFAULT_VALUE.to_string(),
            context: None,
            taken_at: Utc::now(),
            on_saved: None,
        }
    }

    /// Runs `f` after every save the server accepted.
    pub fn with_on_saved(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_saved = Some(Box::new(f));
        self
    }

    /// The save button is enabled.
    pub fn is_complete(&self) -> bool {
        self.draft().is_complete()
    }

    pub fn draft(&self) -> LogDraft {
        LogDraft {
            value: self.value.clone(),
            context: self.context,
            taken_at: Some(self.taken_at),
        }
    }

    /// Back to the default value, no context, and the current time.
    pub fn reset(&mut self) {
        self.value = DEFAULT_VALUE.to_string();
        self.context = None;
        self.taken_at = Utc::now();
    }

    /// Saves the form through `sync`.
    ///
    /// The form is reset and the callback fired whenever the server accepted
    /// the write, even if its response could not be added to the list. On
    /// any other outcome the entered values are kept.
    pub async fn submit<A, S>(&mut self, sync: &LogSync<A, S>) -> Result<CreateOutcome, SyncError>
    where
        A: GlucoseApi,
        S: KeyValueStore,
    {
        let outcome = sync.create(&self.draft()).await?;
        if outcome.is_saved() {
            self.reset();
            if let Some(on_saved) = self.on_saved.as_mut() {
                on_saved();
            }
        }
        Ok(outcome)
    }
}
