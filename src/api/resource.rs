use super::datetime;
use super::entity::{Entity, RecordId};
use crate::screen::{date_field, flag_field, time_field, FieldKind, FieldSpec, Form, FormError};
use crate::session::UserId;
use chrono::NaiveDateTime;
use fake::Dummy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines user data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Request body for registering a user.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} <{}>", self.id, self.name, self.email)
    }
}

/// Defines task data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Deserialize)]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "datetime::option::deserialize")]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed: bool,
    pub user_id: UserId,
}

/// Editable task fields.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
    #[serde(serialize_with = "datetime::option::serialize")]
    pub due_date: Option<NaiveDateTime>,
    pub completed: bool,
}

const TASK_SCHEMA: &[FieldSpec] = &[
    FieldSpec::new("title", "Title", FieldKind::Text),
    FieldSpec::new("description", "Description", FieldKind::OptionalText),
    FieldSpec::new("due_date", "Due date", FieldKind::Date),
    FieldSpec::new("completed", "Completed", FieldKind::Flag),
];

impl Entity for Task {
    type Fields = TaskFields;
    const COLLECTION: &'static str = "tasks";
    const LABEL: &'static str = "task";
    const SCHEMA: &'static [FieldSpec] = TASK_SCHEMA;

    fn id(&self) -> RecordId {
        self.id
    }

    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn to_form(&self) -> Form {
        Form::new(Self::SCHEMA)
            .with("title", self.title.as_str())
            .with("description", self.description.clone().unwrap_or_default())
            .with("due_date", date_field(self.due_date.as_ref()))
            .with("completed", flag_field(self.completed))
    }

    fn fields_from_form(form: &Form) -> Result<TaskFields, FormError> {
        Ok(TaskFields {
            title: form.text("title"),
            description: form.optional_text("description"),
            due_date: form.date("due_date")?,
            completed: form.flag("completed")?,
        })
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = if self.completed { "x" } else { " " };
        write!(f, "#{} [{}] {}", self.id, check, self.title)?;
        if let Some(due_date) = &self.due_date {
            write!(f, " (due {})", due_date.format(datetime::DATE_FORMAT))?;
        }
        Ok(())
    }
}

/// Defines school activity data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Deserialize)]
pub struct SchoolActivity {
    pub id: RecordId,
    pub subject: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "datetime::option::deserialize")]
    pub deadline: Option<NaiveDateTime>,
    pub user_id: UserId,
}

/// Editable school activity fields.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SchoolActivityFields {
    pub subject: String,
    pub description: Option<String>,
    #[serde(serialize_with = "datetime::option::serialize")]
    pub deadline: Option<NaiveDateTime>,
}

const SCHOOL_SCHEMA: &[FieldSpec] = &[
    FieldSpec::new("subject", "Subject", FieldKind::Text),
    FieldSpec::new("description", "Description", FieldKind::OptionalText),
    FieldSpec::new("deadline", "Deadline", FieldKind::Date),
];

impl Entity for SchoolActivity {
    type Fields = SchoolActivityFields;
    const COLLECTION: &'static str = "school";
    const LABEL: &'static str = "school activity";
    const SCHEMA: &'static [FieldSpec] = SCHOOL_SCHEMA;

    fn id(&self) -> RecordId {
        self.id
    }

    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn to_form(&self) -> Form {
        Form::new(Self::SCHEMA)
            .with("subject", self.subject.as_str())
            .with("description", self.description.clone().unwrap_or_default())
            .with("deadline", date_field(self.deadline.as_ref()))
    }

    fn fields_from_form(form: &Form) -> Result<SchoolActivityFields, FormError> {
        Ok(SchoolActivityFields {
            subject: form.text("subject"),
            description: form.optional_text("description"),
            deadline: form.date("deadline")?,
        })
    }
}

impl fmt::Display for SchoolActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.subject)?;
        if let Some(deadline) = &self.deadline {
            write!(f, " (deadline {})", deadline.format(datetime::DATE_FORMAT))?;
        }
        Ok(())
    }
}

/// Defines health entry data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Deserialize)]
pub struct HealthEntry {
    pub id: RecordId,
    pub activity: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub time: Option<String>, // HH:MM or a date
    #[serde(default, deserialize_with = "datetime::option::deserialize")]
    pub date: Option<NaiveDateTime>,
    pub user_id: UserId,
}

/// Editable health entry fields. A missing date is filled in by the service.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HealthEntryFields {
    pub activity: String,
    pub description: Option<String>,
    pub time: Option<String>,
    #[serde(serialize_with = "datetime::option::serialize")]
    pub date: Option<NaiveDateTime>,
}

const HEALTH_SCHEMA: &[FieldSpec] = &[
    FieldSpec::new("activity", "Activity", FieldKind::Text),
    FieldSpec::new("description", "Description", FieldKind::OptionalText),
    FieldSpec::new("time", "Time", FieldKind::Time),
    FieldSpec::new("date", "Date", FieldKind::Date),
];

impl Entity for HealthEntry {
    type Fields = HealthEntryFields;
    const COLLECTION: &'static str = "health";
    const LABEL: &'static str = "health entry";
    const SCHEMA: &'static [FieldSpec] = HEALTH_SCHEMA;

    fn id(&self) -> RecordId {
        self.id
    }

    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn to_form(&self) -> Form {
        Form::new(Self::SCHEMA)
            .with("activity", self.activity.as_str())
            .with("description", self.description.clone().unwrap_or_default())
            .with("time", time_field(self.time.as_deref()))
            .with("date", date_field(self.date.as_ref()))
    }

    fn fields_from_form(form: &Form) -> Result<HealthEntryFields, FormError> {
        Ok(HealthEntryFields {
            activity: form.text("activity"),
            description: form.optional_text("description"),
            time: form.time("time")?,
            date: form.date("date")?,
        })
    }
}

impl fmt::Display for HealthEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.activity)?;
        if let Some(time) = &self.time {
            write!(f, " at {}", time)?;
        }
        if let Some(date) = &self.date {
            write!(f, " on {}", date.format(datetime::DATE_FORMAT))?;
        }
        Ok(())
    }
}
