//! Failures raised by code of the type under test.
//!
//! Initializers, methods and the declared equality/hash/string functions of a
//! registered type return `Result<_, Fault>`. Panics inside them are caught by
//! [`guard`] and surface as [`Fault::Panicked`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// A failure inside the type under test.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Fault {
    /// A required value was absent.
    #[error("null reference: {0}")]
    NullReference(String),

    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// An argument was well-typed but not in the format the type expects.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// The member relies on collaborator state that is not set up yet.
    #[error("uninitialized state: {0}")]
    UninitializedState(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Other(String),
}

impl Fault {
    pub fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Fault {
        Fault::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Faults that point at caller-supplied data rather than at the type.
    pub fn is_argument_related(&self) -> bool {
        matches!(self, Fault::IllegalArgument(_) | Fault::InvalidFormat(_))
    }
}

/// Run `f`, converting a panic into [`Fault::Panicked`].
pub fn guard<R, F>(f: F) -> Result<R, Fault>
where
    F: FnOnce() -> Result<R, Fault>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(Fault::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
