//! Scripted [`GlucoseApi`] for unit tests.
//!
//! Replies are queued per endpoint and consumed in call order. A list reply
//! can be left pending and resolved later through a oneshot sender, which
//! lets tests control the order in which overlapping fetches complete.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::oneshot;

use super::{ApiError, GlucoseApi};
use crate::models::{GlucoseLog, NewGlucoseLog};

type ListResult = Result<Vec<GlucoseLog>, ApiError>;

enum ListReply {
    Ready(ListResult),
    Pending(oneshot::Receiver<ListResult>),
}

#[derive(Default)]
pub(crate) struct ScriptedApi {
    lists: Mutex<VecDeque<ListReply>>,
    creates: Mutex<VecDeque<Result<Value, ApiError>>>,
    deletes: Mutex<VecDeque<Result<(), ApiError>>>,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<NewGlucoseLog>>,
}

impl ScriptedApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_list(&self, reply: ListResult) {
        self.lists.lock().unwrap().push_back(ListReply::Ready(reply));
    }

    pub(crate) fn push_pending_list(&self) -> oneshot::Sender<ListResult> {
        let (tx, rx) = oneshot::channel();
        self.lists.lock().unwrap().push_back(ListReply::Pending(rx));
        tx
    }

    pub(crate) fn push_create(&self, reply: Result<Value, ApiError>) {
        self.creates.lock().unwrap().push_back(reply);
    }

    pub(crate) fn push_delete(&self, reply: Result<(), ApiError>) {
        self.deletes.lock().unwrap().push_back(reply);
    }

    /// Every call made so far, e.g. `"list tok"`, `"delete tok abc"`.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Bodies sent to `create_log`.
    pub(crate) fn created(&self) -> Vec<NewGlucoseLog> {
        self.created.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn unscripted() -> ApiError {
    ApiError::Network("no scripted reply".to_string())
}

impl GlucoseApi for ScriptedApi {
    async fn list_logs(&self, token: &str) -> Result<Vec<GlucoseLog>, ApiError> {
        self.record(format!("list {}", token));
        let reply = self.lists.lock().unwrap().pop_front();
        match reply {
            Some(ListReply::Ready(result)) => result,
            Some(ListReply::Pending(rx)) => rx.await.unwrap_or_else(|_| Err(unscripted())),
            None => Err(unscripted()),
        }
    }

    async fn create_log(&self, token: &str, log: &NewGlucoseLog) -> Result<Value, ApiError> {
        self.record(format!("create {}", token));
        self.created.lock().unwrap().push(log.clone());
        let reply = self.creates.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| Err(unscripted()))
    }

    async fn delete_log(&self, token: &str, id: &str) -> Result<(), ApiError> {
        self.record(format!("delete {} {}", token, id));
        let reply = self.deletes.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| Err(unscripted()))
    }
}
