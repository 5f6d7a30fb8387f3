//! Session context carried into every entity client call.

use fake::Dummy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Service-side identifier of a user.
///
#[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The active user on whose behalf collections are listed and mutated.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
}

impl Session {
    pub fn new(user_id: i64) -> Self {
        Session {
            user_id: UserId(user_id),
        }
    }
}
