//! Screen state machine-specific error types.

use super::form::FormError;
use super::status::{ScreenState, Slot};
use crate::api::RecordId;

/// Errors that can occur when a user action is applied to a screen.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScreenError {
    /// Action not available in the current state
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: ScreenState,
        action: &'static str,
    },

    /// Record not present in the last fetched list
    #[error("Record {id} is not in the current list")]
    RecordNotFound { id: RecordId },

    /// Edit or delete without a tracked target record
    #[error("No record selected")]
    NoSelection,

    /// A request for the same action is still pending
    #[error("A {0} request is already in flight")]
    ActionInFlight(Slot),

    /// Submitted form could not be parsed
    #[error(transparent)]
    Form(#[from] FormError),
}
