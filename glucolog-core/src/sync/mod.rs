//! Keeping the local log list in step with the server.
//!
//! [`LogSync`] drives fetch, create and delete against a [`GlucoseApi`]
//! implementation and applies confirmed results to a shared [`LogStore`].
//! [`LogForm`] holds the entry form that feeds [`LogSync::create`].
//!
//! [`GlucoseApi`]: crate::api::GlucoseApi
//! [`LogStore`]: crate::store::LogStore

mod controller;
mod error;
mod form;
mod state;

pub use controller::{
    Confirmation, CreateOutcome, DeleteOutcome, FetchOutcome, LogDraft, LogSync,
};
pub use error::SyncError;
pub use form::{LogForm, DEFAULT_VALUE};
pub use state::{FetchOrdering, SyncPhase};
