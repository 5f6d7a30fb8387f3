//! Screen state types.
//!
//! This module contains the states a screen moves through, the action slots
//! guarded against concurrent use and the notification raised on failures.

use crate::api::{ApiError, ErrorKind};
use std::fmt;

/// Specifying the different screen states.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ScreenState {
    Viewing,
    Loading,
    CreateForm,
    EditForm,
    ConfirmingDelete,
}

impl ScreenState {
    pub fn is_form(&self) -> bool {
        matches!(self, ScreenState::CreateForm | ScreenState::EditForm)
    }
}

impl fmt::Display for ScreenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScreenState::Viewing => "viewing the list",
            ScreenState::Loading => "loading",
            ScreenState::CreateForm => "in the create form",
            ScreenState::EditForm => "in the edit form",
            ScreenState::ConfirmingDelete => "confirming a delete",
        };
        f.write_str(label)
    }
}

/// Specifying the action slots that can have a request in flight.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Slot {
    Fetch,
    Save,
    Delete,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Slot::Fetch => "fetch",
            Slot::Save => "save",
            Slot::Delete => "delete",
        };
        f.write_str(label)
    }
}

/// Identifies one request issued for a slot. Responses carrying a ticket that
/// is no longer current for its slot are discarded.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Ticket {
    pub slot: Slot,
    pub generation: u64,
}

/// Generation of the request currently in flight per slot.
///
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct InFlight {
    fetch: Option<u64>,
    save: Option<u64>,
    delete: Option<u64>,
}

impl InFlight {
    pub(crate) fn get(&self, slot: Slot) -> Option<u64> {
        *self.slot(slot)
    }

    /// Set the current generation for a slot, returning the one it replaced.
    ///
    pub(crate) fn replace(&mut self, slot: Slot, generation: u64) -> Option<u64> {
        self.slot_mut(slot).replace(generation)
    }

    /// Clear the slot if the ticket is the current one for it.
    ///
    pub(crate) fn settle(&mut self, ticket: Ticket) -> bool {
        let current = self.slot_mut(ticket.slot);
        if *current == Some(ticket.generation) {
            *current = None;
            true
        } else {
            false
        }
    }

    fn slot(&self, slot: Slot) -> &Option<u64> {
        match slot {
            Slot::Fetch => &self.fetch,
            Slot::Save => &self.save,
            Slot::Delete => &self.delete,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<u64> {
        match slot {
            Slot::Fetch => &mut self.fetch,
            Slot::Save => &mut self.save,
            Slot::Delete => &mut self.delete,
        }
    }
}

/// Blocking message shown to the user after a failed write.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: ErrorKind,
}

impl Notification {
    pub fn failure(title: impl Into<String>, error: &ApiError) -> Self {
        Notification {
            title: title.into(),
            message: error.to_string(),
            kind: error.kind(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.title, self.kind, self.message)
    }
}
