//! CRUD screen state machine.
//!
//! This module contains the generic screen shared by every entity domain:
//! - Main `Screen` struct driving list, form and delete-confirmation states
//! - Form editing types (Form, FieldSpec, FieldKind)
//! - State, slot and notification types
//! - Screen error handling

mod error;
mod form;
mod screen_impl;
mod status;

pub use error::ScreenError;
pub use form::{date_field, flag_field, time_field, FieldKind, FieldSpec, Form, FormError};
pub use screen_impl::Screen;
pub use status::{Notification, ScreenState, Slot, Ticket};
