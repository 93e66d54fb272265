//! Per-session conversation state.
//!
//! A [`Context`] holds the ordered request/response/visited-label logs plus an
//! open `misc` scratch map for author-defined data. The caller owns it for the
//! session's lifetime and passes it by exclusive mutable access into each
//! turn; the engine never retains a reference after the call returns. After
//! any completed turn the three logs have equal length (one full triple is
//! committed atomically per turn).
//!
//! Serialized contexts enter the engine through the explicit normalization
//! boundary ([`Context::from_json`] / [`Context::from_value`]); there is no
//! implicit polymorphic casting inside the core.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::capability::Response;
use crate::label::Label;

/// A raw context could not be normalized into a [`Context`].
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("invalid context format: {0}")]
    InvalidFormat(String),
}

/// Per-session mutable state: history logs + scratch data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// Unique context id, e.g. for tracking one user across turns.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Request log, one entry per completed turn, most recent last.
    #[serde(default)]
    pub requests: Vec<String>,
    /// Response log, aligned with `requests`.
    #[serde(default)]
    pub responses: Vec<Response>,
    /// Visited-label log, aligned with `requests`.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Author-defined keyed values; not interpreted by the engine. Preserves
    /// insertion order across serialization.
    #[serde(default)]
    pub misc: serde_json::Map<String, Value>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Creates an empty context with a fresh id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            requests: Vec::new(),
            responses: Vec::new(),
            labels: Vec::new(),
            misc: serde_json::Map::new(),
        }
    }

    /// Normalizes a serialized context (JSON string) into a live one.
    pub fn from_json(raw: &str) -> Result<Self, ContextError> {
        serde_json::from_str(raw).map_err(|e| ContextError::InvalidFormat(e.to_string()))
    }

    /// Normalizes an already-parsed JSON value into a context.
    pub fn from_value(value: Value) -> Result<Self, ContextError> {
        serde_json::from_value(value).map_err(|e| ContextError::InvalidFormat(e.to_string()))
    }

    /// Serializes the context to JSON. Round-trips losslessly: all logs and
    /// the `misc` map keep insertion order.
    pub fn to_json(&self) -> Result<String, ContextError> {
        serde_json::to_string(self).map_err(|e| ContextError::InvalidFormat(e.to_string()))
    }

    /// Appends the next request.
    pub fn add_request(&mut self, request: impl Into<String>) {
        self.requests.push(request.into());
    }

    /// Appends the next response.
    pub fn add_response(&mut self, response: Response) {
        self.responses.push(response);
    }

    /// Appends the next visited label.
    pub fn add_label(&mut self, label: Label) {
        self.labels.push(label);
    }

    /// Drops the most recent request entry. Used by the actor to roll an
    /// uncommitted turn back.
    pub(crate) fn rollback_request(&mut self) {
        self.requests.pop();
    }

    /// Last received request, if any.
    pub fn last_request(&self) -> Option<&str> {
        self.requests.last().map(String::as_str)
    }

    /// Last emitted response, if any.
    pub fn last_response(&self) -> Option<&Response> {
        self.responses.last()
    }

    /// Last visited label, if any.
    pub fn last_label(&self) -> Option<&Label> {
        self.labels.last()
    }

    /// Number of completed turns recorded in the visited-label log.
    pub fn turns(&self) -> usize {
        self.labels.len()
    }

    /// Trims the request/response/label logs to the last `hold_last_n_turns`
    /// entries. `misc` is untouched.
    pub fn clear(&mut self, hold_last_n_turns: usize) {
        let cut = |len: usize| len.saturating_sub(hold_last_n_turns);
        let n = cut(self.requests.len());
        self.requests.drain(..n);
        let n = cut(self.responses.len());
        self.responses.drain(..n);
        let n = cut(self.labels.len());
        self.labels.drain(..n);
    }
}
