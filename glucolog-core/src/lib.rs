//! Glucolog Core Library
//!
//! Blood-glucose log syncing against a remote REST API: models, the HTTP
//! client, session storage and the observable log store.

pub mod api;
pub mod auth;
pub mod launch;
pub mod models;
pub mod session;
pub mod store;
pub mod sync;

pub use api::{ApiClient, ApiError, GlucoseApi, DEFAULT_API_URL};
pub use auth::{check_otp, full_phone, mask_phone, mask_token, AuthInputError};
pub use launch::{resolve_launch, Launch};
pub use models::{
    GlucoseLog, Gender, NewGlucoseLog, NewProfile, ProfileForm, ReadingContext, ValidationError,
};
pub use session::{FileStore, KeyValueStore, MemoryStore, SessionError};
pub use store::LogStore;
pub use sync::{
    Confirmation, CreateOutcome, DeleteOutcome, FetchOrdering, FetchOutcome, LogDraft, LogForm,
    LogSync, SyncError, SyncPhase, DEFAULT_VALUE,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
