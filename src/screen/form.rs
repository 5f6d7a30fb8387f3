//! Form editing state types.
//!
//! A [`Form`] holds the raw text of every field an entity's schema exposes.
//! Values stay as typed by the user until the form is submitted, at which
//! point the entity parses them into request fields with the helpers below.

use crate::api::datetime;
use chrono::{NaiveDateTime, NaiveTime};

const TIME_FORMAT: &str = "%H:%M";

/// How the raw text of a field is interpreted on submission.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FieldKind {
    /// Free text, forwarded verbatim
    Text,
    /// Free text, empty means absent
    OptionalText,
    /// `YYYY-MM-DD` or a full datetime, empty means absent
    Date,
    /// `HH:MM` or a date, empty means absent
    Time,
    /// `true` or `false`, empty means false
    Flag,
}

/// Describes one editable field of an entity.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        FieldSpec { name, label, kind }
    }
}

/// Errors raised while editing or submitting a form.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Invalid date for {field}: '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid time for {field}: '{value}' (expected HH:MM or YYYY-MM-DD)")]
    InvalidTime { field: &'static str, value: String },

    #[error("Invalid value for {field}: '{value}' (expected true or false)")]
    InvalidFlag { field: &'static str, value: String },
}

/// Transient field values of a create or edit form.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    schema: &'static [FieldSpec],
    values: Vec<String>,
}

impl Form {
    /// Returns a form with every field empty.
    ///
    pub fn new(schema: &'static [FieldSpec]) -> Self {
        Form {
            schema,
            values: vec![String::new(); schema.len()],
        }
    }

    /// Builder used when pre-populating a form from a record. Names outside
    /// the schema are ignored.
    ///
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        if let Some(index) = self.index_of(name) {
            self.values[index] = value.into();
        }
        self
    }

    /// Set the raw value of a field.
    ///
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let index = self
            .index_of(name)
            .ok_or_else(|| FormError::UnknownField(name.to_owned()))?;
        self.values[index] = value.into();
        Ok(())
    }

    /// Return the raw value of a field, empty if the field is unknown.
    ///
    pub fn value(&self, name: &str) -> &str {
        self.index_of(name)
            .map(|index| self.values[index].as_str())
            .unwrap_or("")
    }

    /// Iterate over field specs paired with their raw values.
    ///
    pub fn entries(&self) -> impl Iterator<Item = (&FieldSpec, &str)> {
        self.schema
            .iter()
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    pub fn text(&self, name: &str) -> String {
        self.value(name).to_owned()
    }

    pub fn optional_text(&self, name: &str) -> Option<String> {
        let value = self.value(name);
        if value.trim().is_empty() {
            None
        } else {
            Some(value.to_owned())
        }
    }

    pub fn date(&self, name: &'static str) -> Result<Option<NaiveDateTime>, FormError> {
        let value = self.value(name).trim();
        if value.is_empty() {
            return Ok(None);
        }
        datetime::parse_date(value)
            .or_else(|| value.parse::<NaiveDateTime>().ok())
            .map(Some)
            .ok_or_else(|| FormError::InvalidDate {
                field: name,
                value: value.to_owned(),
            })
    }

    /// Parse a time of day as `HH:MM`. A date is accepted too and sent in
    /// its canonical datetime form.
    ///
    pub fn time(&self, name: &'static str) -> Result<Option<String>, FormError> {
        let value = self.value(name).trim();
        if value.is_empty() {
            return Ok(None);
        }
        if let Ok(time) = NaiveTime::parse_from_str(value, TIME_FORMAT) {
            return Ok(Some(time.format(TIME_FORMAT).to_string()));
        }
        datetime::parse_date(value)
            .or_else(|| value.parse::<NaiveDateTime>().ok())
            .map(|date| Some(datetime::format(&date)))
            .ok_or_else(|| FormError::InvalidTime {
                field: name,
                value: value.to_owned(),
            })
    }

    pub fn flag(&self, name: &'static str) -> Result<bool, FormError> {
        match self.value(name).trim().to_ascii_lowercase().as_str() {
            "" | "false" | "no" => Ok(false),
            "true" | "yes" => Ok(true),
            other => Err(FormError::InvalidFlag {
                field: name,
                value: other.to_owned(),
            }),
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.schema.iter().position(|spec| spec.name == name)
    }
}

/// Render an optional datetime as the date portion shown in forms.
///
pub fn date_field(value: Option<&NaiveDateTime>) -> String {
    value
        .map(|value| value.format(datetime::DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Render a stored time for forms. Times holding a date show the date
/// portion only.
///
pub fn time_field(value: Option<&str>) -> String {
    match value {
        Some(value) => match datetime::parse(value) {
            Some(date) => date_field(Some(&date)),
            None => value.to_owned(),
        },
        None => String::new(),
    }
}

pub fn flag_field(value: bool) -> String {
    value.to_string()
}
