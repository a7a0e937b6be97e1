//! Error kinds for scenario operations.
//!
//! Nothing here is fatal: callers either recover locally (skip, no-op) or
//! surface the message once at the load/save boundary.

use crate::id::{LineId, ObjectId, TabId};
use crate::model::ObjectType;
use thiserror::Error;

/// Errors produced by the scenario model, codec, and engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoardError {
    /// The document is not well-formed or lacks required fields.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// An operation targets an object that does not exist on the active canvas.
    #[error("object not found: {0}")]
    DanglingReference(ObjectId),

    /// An operation was invoked in a state where it has no meaning.
    #[error("invalid transition: {0}")]
    InvalidTransition(&'static str),

    /// An attribute was assigned to an object type that does not carry it.
    #[error("attribute `{attribute}` does not apply to {object_type} objects")]
    AttributeMismatch {
        attribute: &'static str,
        object_type: ObjectType,
    },

    #[error("{0} not found")]
    UnknownTab(TabId),

    #[error("connection not found: {0}")]
    UnknownConnection(LineId),

    /// An id counter has reached the top of its range.
    #[error("id counter `{0}` is exhausted")]
    CounterExhausted(&'static str),

    /// A connection was requested from an object to itself.
    #[error("cannot connect {0} to itself")]
    SelfConnection(ObjectId),
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedDocument(err.to_string())
    }
}

pub type Result<T, E = BoardError> = std::result::Result<T, E>;
