//! Entity descriptor shared by the three collections.
//!
//! Every domain (tasks, school activities, health entries) is described once
//! through [`Entity`]: the collection it lives in, the fields a form edits and
//! how those fields are turned into a request body. The client, store and
//! screen are generic over it.

use crate::screen::{FieldSpec, Form, FormError};
use crate::session::UserId;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// Service-assigned record identifier.
pub type RecordId = i64;

pub trait Entity:
    Clone + fmt::Debug + fmt::Display + DeserializeOwned + Send + Sync + 'static
{
    /// Editable fields sent on create and update, without `id` or `user_id`.
    type Fields: Clone + fmt::Debug + PartialEq + Serialize + Send + Sync + 'static;

    /// Path segment of the REST collection.
    const COLLECTION: &'static str;

    /// Human readable singular name, used in logs and notifications.
    const LABEL: &'static str;

    /// Fields the create and edit forms expose, in display order.
    const SCHEMA: &'static [FieldSpec];

    fn id(&self) -> RecordId;

    fn user_id(&self) -> UserId;

    /// Form pre-populated from this record.
    fn to_form(&self) -> Form;

    /// Request fields parsed from a submitted form.
    fn fields_from_form(form: &Form) -> Result<Self::Fields, FormError>;
}
